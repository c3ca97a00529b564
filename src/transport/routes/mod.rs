pub mod events;
pub mod info;
