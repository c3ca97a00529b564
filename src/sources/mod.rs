pub mod applemusic;
pub mod manager;
pub mod plugin;
pub mod spotify;
#[cfg(test)]
pub mod testing;
pub mod yandexmusic;
pub mod youtube;

pub use manager::SourceManager;
pub use plugin::{BoxedSource, MusicSource};
