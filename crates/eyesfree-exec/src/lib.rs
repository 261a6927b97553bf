//! eyesfree process plumbing
//!
//! Both eyesfree utilities are thin orchestrations of external commands:
//! `adb` for package installation, `say` and `sox` for speech clip
//! synthesis. This crate holds what they share.
//!
//! # Overview
//!
//! - [`tool`] - Locating tool executables (override, env var, PATH, common paths)
//! - [`runner`] - Describing an [`Invocation`] and running it to completion
//! - [`error`] - Error types and stable error codes
//!
//! Invocations are strictly sequential: [`SystemRunner`] spawns the child,
//! feeds optional stdin text, and blocks until the child exits. There are no
//! timeouts and no retries.
//!
//! # Example
//!
//! ```ignore
//! use eyesfree_exec::{CommandRunner, Invocation, SystemRunner, Tool, ToolLocator};
//!
//! let adb = ToolLocator::new().locate(Tool::Adb)?;
//! let outcome = SystemRunner::new().run(&Invocation::new(adb).args(["install", "-r", "app.apk"]))?;
//! println!("exit code: {:?}", outcome.code());
//! ```

pub mod error;
pub mod runner;
pub mod tool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export main types at crate root
pub use error::{ErrorCode, ExecError, ExecResult};
pub use runner::{CommandRunner, Invocation, Outcome, SystemRunner};
pub use tool::{Tool, ToolLocator};
