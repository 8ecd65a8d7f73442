use crate::config::Config;
use crate::error::{FsError, FsResult};
use crate::vfs::{FileHandle, FileSystem, OpenMode};

/// Ordered collection of filesystem backends.
///
/// Backends are consulted in registration order; the first one that claims
/// a path handles it.
#[derive(Default)]
pub struct FileSystemRegistry {
    backends: Vec<Box<dyn FileSystem>>,
}

impl FileSystemRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend. Later registrations lose ties to earlier ones.
    pub fn register(&mut self, backend: Box<dyn FileSystem>) {
        self.backends.push(backend);
    }

    /// First backend that claims `path`, if any.
    pub fn find(&self, path: &str) -> Option<&dyn FileSystem> {
        self.backends
            .iter()
            .map(|b| b.as_ref())
            .find(|b| b.can_handle(path))
    }

    /// Route `path` to the backend that claims it and open a stream.
    pub fn open(
        &self,
        path: &str,
        mode: OpenMode,
        config: &Config,
    ) -> FsResult<Box<dyn FileHandle>> {
        let Some(backend) = self.find(path) else {
            return Err(FsError::Unroutable {
                path: path.to_string(),
            });
        };
        backend.open(path, mode, config)
    }
}
