#![warn(clippy::pedantic)]

pub mod bignum;
pub mod convenience;
pub mod error;
pub mod options;
pub mod reader;
pub mod tags;

pub use convenience::{decode_events, decode_value, decode_values};
pub use error::{DecodeError, ErrorCode};
pub use options::DecoderOptions;
pub use reader::StreamReader;
pub use tags::TagMeaning;
