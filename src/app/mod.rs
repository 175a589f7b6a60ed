// Application layer - Session orchestration and observation

pub mod container;
pub mod events;
pub mod session;

// Re-export the application surface
pub use container::DefaultAppContainer;
pub use events::{EventSink, JsonEventSink, NoopEventSink, SessionEvent, TracingEventSink};
pub use session::{SessionSnapshot, TrimSession};
