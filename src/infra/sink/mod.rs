//! Completion sink backends.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlSink;
pub use memory::InMemorySink;
