#![warn(clippy::pedantic)]

pub mod error;
pub mod major;
pub mod primitive;
pub mod source;

pub use error::WireError;
pub use major::{MajorType, additional_info, classify, major_type};
pub use primitive::{Length, NegativeInt};
pub use source::{ReaderSource, SliceSource, Source};
