#![warn(clippy::pedantic)]

pub mod writer;

pub use writer::Writer;
