use anyhow::{Context, Result};
use dashmap::DashMap;
use glob::glob;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::options::DEFAULT_EXTENSION;

/// Supplies partial bodies by name.
///
/// Closures of the shape `Fn(&str) -> anyhow::Result<String>` are loaders too.
pub trait PartialLoader {
    fn load(&self, name: &str) -> Result<String>;
}

impl<F> PartialLoader for F
where
    F: Fn(&str) -> Result<String>,
{
    fn load(&self, name: &str) -> Result<String> {
        self(name)
    }
}

/// A loader that has no partials; every lookup fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLoader;

impl PartialLoader for NullLoader {
    fn load(&self, name: &str) -> Result<String> {
        anyhow::bail!("no partial loader configured for {:?}", name)
    }
}

/// Reads `<dir>/<name>.<extension>` from the file system on every lookup.
#[derive(Debug, Clone)]
pub struct FileLoader {
    dir: PathBuf,
    extension: String,
}

impl FileLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Uses `extension` (without the leading dot) instead of `mustache`.
    /// An empty extension loads `<dir>/<name>` as is.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let path = self.dir.join(name);
        if self.extension.is_empty() {
            path
        } else {
            let mut file = path.into_os_string();
            file.push(".");
            file.push(&self.extension);
            PathBuf::from(file)
        }
    }
}

impl PartialLoader for FileLoader {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.path_for(name);
        debug!("loading partial {:?} from {}", name, path.display());
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read partial file {}", path.display()))
    }
}

/// An in-memory partial store.
///
/// Backed by a concurrent map, so partials can be registered through a shared
/// reference while other threads render.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    partials: DashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a loader from `(name, body)` pairs, e.g. from `partial_assets!`.
    pub fn from_assets<N, B>(assets: impl IntoIterator<Item = (N, B)>) -> Self
    where
        N: Into<String>,
        B: Into<String>,
    {
        let loader = Self::new();
        for (name, body) in assets {
            loader.insert(name, body);
        }
        loader
    }

    /// Registers or replaces a partial.
    pub fn insert(&self, name: impl Into<String>, body: impl Into<String>) {
        self.partials.insert(name.into(), body.into());
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.partials.remove(name).map(|(_, body)| body)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.partials.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.partials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Loads every file matching `pattern`, naming each partial by its file stem.
    ///
    /// # Arguments
    /// * `pattern` - a file glob, e.g. `"templates/partials/*.mustache"`
    ///
    /// Returns how many partials were registered.
    pub fn load_glob(&self, pattern: &str) -> Result<usize> {
        let paths = glob(pattern).with_context(|| format!("invalid glob pattern: {}", pattern))?;
        let mut count = 0;
        for entry in paths {
            let path = entry.with_context(|| format!("failed to read path for: {}", pattern))?;
            if !path.is_file() {
                continue;
            }
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .with_context(|| format!("partial file has no name: {}", path.display()))?;
            let body = fs::read_to_string(&path)
                .with_context(|| format!("failed to read partial file {}", path.display()))?;
            debug!("registered partial {:?} from {}", name, path.display());
            self.insert(name, body);
            count += 1;
        }
        Ok(count)
    }
}

impl PartialLoader for MemoryLoader {
    fn load(&self, name: &str) -> Result<String> {
        self.partials
            .get(name)
            .map(|body| body.value().clone())
            .with_context(|| format!("partial {:?} is not registered", name))
    }
}
