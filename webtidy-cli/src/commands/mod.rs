//! CLI command implementations.

pub mod format;
pub mod init;
pub mod thread;

pub use format::{format_files, FormatOptions};
pub use init::init_project;
pub use thread::{close_thread, open_thread};
