//! Touch gesture engine
//!
//! Gesture types, the per-page process registry, the enabled-process set,
//! the classifier and the per-tick orchestrator.

pub mod classifier;
pub mod enabled;
pub mod orchestrator;
pub mod registry;
pub mod types;

pub use classifier::{Classifier, Judgement};
pub use enabled::EnabledSet;
pub use orchestrator::{FrameOrchestrator, SessionLatch};
pub use registry::{Process, ProcessError, ProcessNum, ProcessPage, ProcessRegistry, ProcessSpec};
pub use types::{GestureFamily, TouchPhase, TouchType};
