//! Built-in handlers.

pub mod activity;

pub use activity::ActivityRecorder;
