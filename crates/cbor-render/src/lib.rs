#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod json;

pub use config::{OutputMode, RenderConfig};
pub use error::RenderError;
pub use json::{JsonRenderer, render_json, render_stream};
