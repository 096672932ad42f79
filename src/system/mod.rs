//! System information module - process records, snapshots and control
//!
//! Everything that touches the kernel lives behind a trait here
//! (`ProcessSource`, `IdentityResolver`, `ProcessControl`) so the session
//! logic can be driven by in-memory fakes in tests.

pub mod control;
pub mod error;
pub mod identity;
pub mod process;
pub mod snapshot;
pub mod source;
pub mod units;

#[cfg(test)]
pub mod testing;

pub use control::{ProcessControl, SignalKind, SystemControl};
pub use error::{ProcessError, ProcessResult};
pub use identity::{IdentityResolver, PasswdResolver};
pub use process::{Process, ProcessState};
pub use snapshot::{Collector, Snapshot};
pub use source::{ProcFs, ProcessSource};
pub use units::{format_cpu_time, format_kb, format_uptime};
