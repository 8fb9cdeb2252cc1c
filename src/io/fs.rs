//! Filesystem query capability.
//!
//! Template arguments that name a directory are expanded by listing it.
//! The lookups go through [`FileSystem`] so callers can swap the real
//! filesystem ([`OsFs`]) for an in-memory tree ([`MemoryFs`]).

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs::File;
use std::io;

use crate::source::{base_name, clean_path, to_slash};

/// Name and type of a filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub is_dir: bool,
}

/// An opened file or directory.
pub trait FileHandle: Debug {
    fn stat(&self) -> io::Result<FileInfo>;
}

pub trait FileSystem: Send + Sync + Debug {
    /// Open `path` for inspection.
    fn open(&self, path: &str) -> io::Result<Box<dyn FileHandle>>;

    /// Immediate entries of the directory at `path`, sorted by name.
    fn read_dir(&self, path: &str) -> io::Result<Vec<FileInfo>>;
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

#[derive(Debug)]
struct OsFile {
    name: String,
    file: File,
}

impl FileHandle for OsFile {
    fn stat(&self) -> io::Result<FileInfo> {
        let meta = self.file.metadata()?;
        Ok(FileInfo {
            name: self.name.clone(),
            is_dir: meta.is_dir(),
        })
    }
}

impl FileSystem for OsFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn FileHandle>> {
        let file = File::open(path)?;
        Ok(Box::new(OsFile {
            name: base_name(path).to_string(),
            file,
        }))
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<FileInfo>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            entries.push(FileInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// An in-memory directory tree.
///
/// Paths are slash-separated and cleaned before use, so `dir/`, `./dir`
/// and `dir` name the same entry. Adding a file creates its parent
/// directories.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    // cleaned path -> is_dir
    entries: BTreeMap<String, bool>,
}

#[derive(Debug)]
struct MemoryFile {
    info: FileInfo,
}

impl FileHandle for MemoryFile {
    fn stat(&self) -> io::Result<FileInfo> {
        Ok(self.info.clone())
    }
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str) -> Self {
        self.add_file(path);
        self
    }

    pub fn with_dir(mut self, path: &str) -> Self {
        self.add_dir(path);
        self
    }

    pub fn add_file(&mut self, path: &str) {
        let key = clean_path(&to_slash(path));
        self.add_parents(&key);
        self.entries.insert(key, false);
    }

    pub fn add_dir(&mut self, path: &str) {
        let key = clean_path(&to_slash(path));
        self.add_parents(&key);
        self.entries.insert(key, true);
    }

    fn add_parents(&mut self, key: &str) {
        let mut current = parent_of(key);
        while let Some(dir) = current {
            self.entries.insert(dir.to_string(), true);
            current = parent_of(dir);
        }
    }
}

/// Parent of a cleaned path, `None` for the roots `.` and `/`.
fn parent_of(path: &str) -> Option<&str> {
    if path == "." || path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/"),
        Some(i) => Some(&path[..i]),
        None => Some("."),
    }
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("open {path}: file does not exist"),
    )
}

impl FileSystem for MemoryFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn FileHandle>> {
        let key = clean_path(&to_slash(path));
        let is_dir = match self.entries.get(&key) {
            Some(is_dir) => *is_dir,
            None if key == "." || key == "/" => true,
            None => return Err(not_found(path)),
        };
        Ok(Box::new(MemoryFile {
            info: FileInfo {
                name: base_name(&key).to_string(),
                is_dir,
            },
        }))
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<FileInfo>> {
        let key = clean_path(&to_slash(path));
        match self.entries.get(&key) {
            Some(true) => {}
            Some(false) => {
                return Err(io::Error::new(
                    io::ErrorKind::NotADirectory,
                    format!("readdir {path}: not a directory"),
                ));
            }
            None if key == "." || key == "/" => {}
            None => return Err(not_found(path)),
        }

        // BTreeMap iteration keeps the result sorted by full path, and all
        // children of one directory share the same prefix.
        let entries = self
            .entries
            .iter()
            .filter(|(p, _)| parent_of(p) == Some(key.as_str()))
            .map(|(p, is_dir)| FileInfo {
                name: base_name(p).to_string(),
                is_dir: *is_dir,
            })
            .collect();
        Ok(entries)
    }
}
