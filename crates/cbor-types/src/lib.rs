#![warn(clippy::pedantic)]

pub mod error;
pub mod event;
pub mod handler;
pub mod tag;
pub mod value;

pub use error::HandlerError;
pub use event::{Event, EventRecorder, replay};
pub use handler::{ContentHandler, Position, SerializingContext};
pub use tag::{ByteStringFormat, SemanticTag};
pub use value::{Value, ValueBuilder};
