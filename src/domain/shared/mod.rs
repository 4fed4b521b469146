//! Shared kernel - Common types used by every part of the call lifecycle

pub mod error;
pub mod events;
pub mod result;
pub mod value_objects;

pub use error::PlatformError;
pub use result::PlatformResult;
pub use value_objects::*;
