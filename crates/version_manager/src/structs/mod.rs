pub mod message;
pub mod transcript;
pub mod version;
