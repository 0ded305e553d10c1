use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_EXTENSION: &str = "scribble";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("module '{module}' not found in {searched}")]
    NotFound { module: String, searched: String },
    #[error("failed to read module '{module}' from {}: {source}", .path.display())]
    Io {
        module: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Supplies the source text of a module by name. Names use `/` between
/// path segments and carry no extension.
pub trait SourceLoader {
    fn load(&self, module: &str) -> Result<String, LoadError>;
}

/// Loads `a/b` from `<search path>/a/b.<extension>`, trying search paths in
/// order.
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    search_paths: Vec<PathBuf>,
    extension: String,
}

impl Default for FileSystemLoader {
    fn default() -> Self {
        Self::new(vec![PathBuf::from(".")])
    }
}

impl FileSystemLoader {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn candidate(&self, root: &Path, module: &str) -> PathBuf {
        let mut path = root.join(module);
        path.set_extension(&self.extension);
        path
    }

    /// First existing file for `module`, if any.
    pub fn resolve(&self, module: &str) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .map(|root| self.candidate(root, module))
            .find(|path| path.is_file())
    }
}

impl SourceLoader for FileSystemLoader {
    fn load(&self, module: &str) -> Result<String, LoadError> {
        let Some(path) = self.resolve(module) else {
            let searched = self
                .search_paths
                .iter()
                .map(|root| self.candidate(root, module).display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(LoadError::NotFound {
                module: module.to_string(),
                searched,
            });
        };
        tracing::debug!(module, path = %path.display(), "loading module");
        std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            module: module.to_string(),
            path,
            source,
        })
    }
}

/// Module sources held in memory, for hosts that own their buffers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    sources: BTreeMap<String, String>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: &str, source: impl Into<String>) {
        self.sources
            .insert(sanitize_module_name(module), source.into());
    }

    pub fn with(mut self, module: &str, source: impl Into<String>) -> Self {
        self.insert(module, source);
        self
    }
}

impl SourceLoader for InMemoryLoader {
    fn load(&self, module: &str) -> Result<String, LoadError> {
        self.sources
            .get(module)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                module: module.to_string(),
                searched: "memory".to_string(),
            })
    }
}

/// Canonical module name: `/` separators, no `./` prefix, no trailing
/// `.scribble` extension.
pub fn sanitize_module_name(raw: &str) -> String {
    let normalized = raw.trim().replace('\\', "/");
    let mut name = normalized.as_str();
    while let Some(rest) = name.strip_prefix("./") {
        name = rest;
    }
    if let Some(stem) = name
        .strip_suffix(DEFAULT_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
    {
        name = stem;
    }
    name.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_module_name("./lib/util.scribble"), "lib/util");
        assert_eq!(sanitize_module_name("lib\\util"), "lib/util");
        assert_eq!(sanitize_module_name(" main "), "main");
        assert_eq!(sanitize_module_name("/abs/main.scribble"), "/abs/main");
    }

    #[test]
    fn file_system_loader_searches_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(second.path().join("lib")).unwrap();
        std::fs::write(second.path().join("lib/util.scribble"), "var x = 1;").unwrap();

        let loader = FileSystemLoader::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(loader.load("lib/util").unwrap(), "var x = 1;");
        assert!(matches!(
            loader.load("lib/missing"),
            Err(LoadError::NotFound { .. })
        ));
    }

    #[test]
    fn in_memory_loader_uses_sanitized_names() {
        let loader = InMemoryLoader::new().with("./a.scribble", "1;");
        assert_eq!(loader.load("a").unwrap(), "1;");
    }
}
