//! Call bounded context - state and per-call context of the single live call

pub mod event;
pub mod session;
pub mod value_object;

pub use event::{CallLifecycleEvent, LifecycleEventKind};
pub use session::{CallInputs, CallSessionContext};
pub use value_object::{CallState, CallType};
