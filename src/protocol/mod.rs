pub mod callback;
pub mod entity;
pub mod links;
pub mod messages;

pub use callback::{CallbackError, ConversionToken};
pub use entity::*;
pub use links::LinkParser;
pub use messages::*;
