//! I/O capabilities injected into a configuration.
//!
//! This module provides:
//! - `InputProvider` / `OutputTarget`: the standard-stream handles a run
//!   reads from and writes to
//! - Process stream implementations (`StdinInput`, `StdoutOutput`, `StderrOutput`)
//! - `PipeBuffer`: the in-memory pipe that captures output for a post-exec command
//! - `FileSystem`: the open/stat/list capability used to expand template directories

mod fs;
mod input;
mod memory;
mod output;
mod std_io;

pub use fs::{FileHandle, FileInfo, FileSystem, MemoryFs, OsFs};
pub use input::InputProvider;
pub use memory::{InMemorySource, PipeBuffer};
pub use output::OutputTarget;
pub use std_io::{StderrOutput, StdinInput, StdoutOutput};
