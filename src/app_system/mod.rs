//! System wiring, startup, and shutdown logic.

pub mod client_system;
pub mod tracing;

pub use client_system::*;
pub use self::tracing::*;
