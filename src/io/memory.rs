//! In-memory stream handles.

use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, Mutex};

use super::{InputProvider, OutputTarget};

/// Fixed in-memory input, mainly for injecting a fake stdin.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    id: String,
    data: Arc<Vec<u8>>,
}

impl InMemorySource {
    pub fn new(id: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            data: Arc::new(data),
        }
    }

    pub fn from_string(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self::new(id, data.into().into_bytes())
    }
}

impl InputProvider for InMemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.data.as_ref().clone())))
    }
}

/// A shared in-memory pipe.
///
/// Everything written through [`OutputTarget::open`] is readable through
/// [`InputProvider::open`]. Exec-pipe mode installs one of these as both
/// the primary output stream and the post-exec command's input. Clones
/// share the same buffer.
#[derive(Debug, Clone)]
pub struct PipeBuffer {
    id: String,
    buf: Arc<Mutex<Vec<u8>>>,
}

impl PipeBuffer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            buf: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of the bytes written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().unwrap().clone()
    }

    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().unwrap().is_empty()
    }

    /// Whether `other` shares this pipe's buffer.
    pub fn same_pipe(&self, other: &PipeBuffer) -> bool {
        Arc::ptr_eq(&self.buf, &other.buf)
    }
}

impl Default for PipeBuffer {
    fn default() -> Self {
        Self::new("pipe")
    }
}

impl OutputTarget for PipeBuffer {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(PipeWriteHandle {
            buf: self.buf.clone(),
        }))
    }
}

impl InputProvider for PipeBuffer {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.contents())))
    }
}

struct PipeWriteHandle {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for PipeWriteHandle {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self.buf.lock().unwrap();
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
