//! Shell command execution and run cancellation.

pub mod cancel;
pub mod command;

pub use cancel::{install_interrupt_handler, CancelToken};
pub use command::{execute, CommandOptions, CommandResult, SHELL};
