//! Output target trait definition.

use std::fmt::Debug;
use std::io::Write;

/// A writable stream handle, such as the process stdout or the exec pipe.
///
/// Writers opened from the same target append to it in order; opening a
/// writer never truncates what earlier writers produced.
pub trait OutputTarget: Send + Sync + Debug {
    /// Identifier used in diagnostics. Convention: "-" for stdout.
    fn id(&self) -> &str;

    fn open(&self) -> std::io::Result<Box<dyn Write + Send>>;
}
