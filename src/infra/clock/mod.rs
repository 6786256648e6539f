//! Virtual-time schedulers.

pub mod event_queue;

pub use event_queue::EventQueue;
