//! Where level files come from. The host decides: a directory on disk for
//! desktop builds, an in-memory map for tests and embedded content.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;

pub trait ContentSource {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read>>;
}

pub struct DirContent {
    root: PathBuf,
}

impl DirContent {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for DirContent {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read>> {
        let file = File::open(self.root.join(path))?;
        Ok(Box::new(file))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryContent {
    files: HashMap<String, String>,
}

impl MemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), body.to_string());
        self
    }
}

impl ContentSource for MemoryContent {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read>> {
        match self.files.get(path) {
            Some(body) => Ok(Box::new(Cursor::new(body.clone().into_bytes()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no content at '{path}'"),
            )),
        }
    }
}
