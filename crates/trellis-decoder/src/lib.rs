#![warn(clippy::pedantic)]

pub mod decoder;
pub mod error;
pub mod extract;

pub use decoder::Decoder;
pub use error::DecodeError;
pub use extract::FromValue;
