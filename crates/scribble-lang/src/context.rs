use scribble_core::error::{ErrorCode, SyntaxError};
use scribble_core::span::{FileId, Span};
use std::collections::{BTreeMap, BTreeSet};

/// State shared by every parse of one compilation: module names waiting to
/// be resolved, the import graph seen so far and the file id allocator.
#[derive(Debug, Default)]
pub struct ParserContext {
    /// Pending module names with the location of the first import asking for them.
    pending: BTreeMap<String, Span>,
    attempted: BTreeSet<String>,
    imports: BTreeMap<String, BTreeSet<String>>,
    warnings: Vec<SyntaxError>,
    next_file: FileId,
}

impl ParserContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_file(&mut self) -> FileId {
        let id = self.next_file;
        self.next_file += 1;
        id
    }

    /// Records that `importer` imports `module`. An edge that closes a cycle
    /// is reported as a warning; the module is still queued once.
    pub fn request_import(&mut self, importer: &str, module: &str, location: Span) {
        if self.reaches(module, importer) {
            tracing::warn!(importer, module, "cyclic import");
            self.warnings.push(SyntaxError::new(
                location,
                ErrorCode::CyclicImport,
                format!("import of '{module}' from '{importer}' forms a cycle"),
            ));
        }
        self.imports
            .entry(importer.to_string())
            .or_default()
            .insert(module.to_string());
        if !self.attempted.contains(module) {
            self.pending.entry(module.to_string()).or_insert(location);
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn take_pending(&mut self) -> Vec<(String, Span)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Marks `module` as attempted; false when it already was.
    pub fn mark_attempted(&mut self, module: &str) -> bool {
        self.attempted.insert(module.to_string())
    }

    pub fn take_warnings(&mut self) -> Vec<SyntaxError> {
        std::mem::take(&mut self.warnings)
    }

    /// Modules imported directly by `module`.
    pub fn imports_of(&self, module: &str) -> impl Iterator<Item = &str> {
        self.imports
            .get(module)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    fn reaches(&self, from: &str, to: &str) -> bool {
        let mut stack = vec![from];
        let mut seen = BTreeSet::new();
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if seen.insert(current) {
                stack.extend(self.imports_of(current));
            }
        }
        false
    }
}
