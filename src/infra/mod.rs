//! Infrastructure adapters: the virtual-time scheduler and completion sinks.

pub mod clock;
pub mod sink;

pub use clock::EventQueue;
pub use sink::{InMemorySink, JsonlSink};
