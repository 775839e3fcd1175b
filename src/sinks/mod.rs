//! Sink implementations

pub mod async_sink;
pub mod console;
pub mod memory;

pub use async_sink::AsyncSink;
pub use console::ConsoleSink;
pub use memory::MemorySink;

pub use crate::core::{NullSink, Sink};
