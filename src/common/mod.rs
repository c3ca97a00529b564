pub mod errors;
pub mod http;
pub mod logger;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use errors::*;
pub use http::*;
pub use types::*;
