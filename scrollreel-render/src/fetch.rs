//! Locator → bytes. The loader only needs this one seam, so frames can come
//! from disk in the app and from memory in tests and benchmarks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::RenderError;

/// Resolves a frame locator to its encoded bytes.
pub trait FrameFetcher: Send + Sync {
    fn fetch(&self, locator: &str) -> crate::Result<Vec<u8>>;
}

/// Reads frames from a directory. Locators are relative to `root`; a
/// leading `/` (web-root style) is ignored.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, locator: &str) -> PathBuf {
        self.root.join(locator.trim_start_matches('/'))
    }
}

impl FrameFetcher for FsFetcher {
    fn fetch(&self, locator: &str) -> crate::Result<Vec<u8>> {
        std::fs::read(self.resolve(locator)).map_err(|source| RenderError::Fetch {
            locator: locator.to_string(),
            source,
        })
    }
}

/// In-memory frames keyed by locator.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    frames: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locator: impl Into<String>, bytes: Vec<u8>) {
        self.frames.insert(locator.into(), bytes);
    }
}

impl FrameFetcher for MemoryFetcher {
    fn fetch(&self, locator: &str) -> crate::Result<Vec<u8>> {
        self.frames
            .get(locator)
            .cloned()
            .ok_or_else(|| RenderError::Fetch {
                locator: locator.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such frame"),
            })
    }
}
