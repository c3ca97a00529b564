pub mod common;
pub mod configs;
pub mod matching;
pub mod protocol;
pub mod resolver;
pub mod server;
pub mod sources;
pub mod transport;
