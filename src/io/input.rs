//! Input provider trait definition.

use std::fmt::Debug;
use std::io::Read;

/// A readable stream handle, such as the process stdin or the exec pipe.
pub trait InputProvider: Send + Sync + Debug {
    /// Identifier used in diagnostics. Convention: "-" for stdin.
    fn id(&self) -> &str;

    /// Open a fresh reader over the source.
    fn open(&self) -> std::io::Result<Box<dyn Read + Send>>;
}
