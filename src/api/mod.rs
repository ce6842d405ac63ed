pub mod envelope;
pub mod format;

pub use envelope::{Envelope, Message, ResultView};
pub use format::{etag, render, Format, Rendered};
