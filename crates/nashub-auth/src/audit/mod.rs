//! Activity log recording.

pub mod recorder;

pub use recorder::ActivityRecorder;
