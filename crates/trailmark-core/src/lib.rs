//! Core services for Trailmark.
//!
//! This crate provides the pieces every other Trailmark crate builds on:
//!
//! - **Platform**: the operating system family and build architecture
//! - **Logging**: `tracing` targets and an injected [`LogManager`] that fans
//!   messages out to pluggable loggers
//! - **Signals**: [`Signal`] change notification used by settings stores
//!
//! Nothing in this crate is a process-wide singleton. The application context
//! owns a `LogManager` and passes it to whoever needs it.

mod error;
pub mod logging;
pub mod platform;
pub mod signal;

pub use error::{CoreError, Result};
pub use logging::{
    FileLogger, LogLevel, LogLevelMask, LogLocation, LogManager, LogMessage, Logger,
    TracingLogger,
};
pub use platform::{ApplicationArchitecture, OsType};
pub use signal::{ConnectionId, Signal};
