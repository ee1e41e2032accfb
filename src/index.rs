//! Per-file documentation index with a two-phase lifecycle.
//!
//! [`DocIndexBuilder`] only collects records. Module resolution needs every
//! file to be present, so it is only available on the sealed [`DocIndex`]
//! returned by [`DocIndexBuilder::seal`].

use crate::model::{DocRecord, SourceFile};
use crate::{parser, resolve};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Records extracted from one file.
#[derive(Debug, Clone, Default)]
pub struct FileDocs {
    pub file_name: String,
    pub docs: Vec<DocRecord>,
}

/// Build phase: populate only.
#[derive(Debug, Default)]
pub struct DocIndexBuilder {
    entries: Vec<FileDocs>,
    positions: HashMap<String, usize>,
}

impl DocIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a file and store its records. Returns how many were found.
    pub fn add_file(&mut self, file: &SourceFile) -> usize {
        let docs = parser::parse(file).unwrap_or_default();
        let count = docs.len();
        debug!(file = %file.file_name, records = count, "parsed");
        self.insert(file.file_name.clone(), docs);
        count
    }

    /// Store records under a file identifier, replacing any earlier entry.
    pub fn insert(&mut self, file_name: impl Into<String>, docs: Vec<DocRecord>) {
        let file_name = file_name.into();
        match self.positions.get(&file_name) {
            Some(&pos) => self.entries[pos].docs = docs,
            None => {
                self.positions.insert(file_name.clone(), self.entries.len());
                self.entries.push(FileDocs { file_name, docs });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// End the build phase.
    pub fn seal(self) -> DocIndex {
        DocIndex {
            entries: self.entries,
            positions: self.positions,
        }
    }
}

/// Resolve phase: the complete index. Files keep their insertion order.
///
/// The only way in is [`DocIndexBuilder::seal`]:
///
/// ```compile_fail
/// let index = ngdoc::DocIndex::default();
/// ```
#[derive(Debug)]
pub struct DocIndex {
    pub(crate) entries: Vec<FileDocs>,
    positions: HashMap<String, usize>,
}

impl DocIndex {
    pub fn files(&self) -> impl Iterator<Item = &FileDocs> {
        self.entries.iter()
    }

    pub fn docs(&self, file_name: &str) -> Option<&[DocRecord]> {
        self.position(file_name).map(|pos| self.entries[pos].docs.as_slice())
    }

    pub(crate) fn position(&self, file_name: &str) -> Option<usize> {
        self.positions.get(file_name).copied()
    }

    /// Back-fill missing modules of one file's records.
    pub fn backfill(&mut self, file_name: &str) -> usize {
        resolve::backfill(self, file_name)
    }

    /// Back-fill missing modules across every file. Returns how many records
    /// were resolved.
    pub fn backfill_all(&mut self) -> usize {
        let names: Vec<String> = self.entries.iter().map(|e| e.file_name.clone()).collect();
        names.iter().map(|name| resolve::backfill(self, name)).sum()
    }

    /// Records with a dialect marker whose module is still unknown.
    pub fn unresolved(&self) -> impl Iterator<Item = &DocRecord> {
        self.entries
            .iter()
            .flat_map(|e| e.docs.iter())
            .filter(|doc| resolve::needs_module(doc))
    }

    /// First record declared as `name` inside `module`.
    pub fn lookup(&self, module: &str, name: &str) -> Option<&DocRecord> {
        self.entries
            .iter()
            .flat_map(|e| e.docs.iter())
            .find(|doc| doc.module.as_deref() == Some(module) && doc.name.as_deref() == Some(name))
    }

    /// Records grouped by module, in file order. Unresolved records are left out.
    pub fn by_module(&self) -> BTreeMap<&str, Vec<&DocRecord>> {
        let mut groups: BTreeMap<&str, Vec<&DocRecord>> = BTreeMap::new();
        for doc in self.entries.iter().flat_map(|e| e.docs.iter()) {
            if let Some(module) = doc.module.as_deref() {
                groups.entry(module).or_default().push(doc);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, body: &str) -> SourceFile {
        SourceFile::new(name, "js", body)
    }

    #[test]
    fn insert_keeps_order_and_replaces() {
        let mut builder = DocIndexBuilder::new();
        builder.insert("b.js", Vec::new());
        builder.insert("a.js", Vec::new());
        builder.insert(
            "b.js",
            vec![DocRecord {
                name: Some("x".to_string()),
                ..Default::default()
            }],
        );
        assert_eq!(builder.len(), 2);

        let index = builder.seal();
        let names: Vec<&str> = index.files().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["b.js", "a.js"]);
        assert_eq!(index.docs("b.js").map(<[DocRecord]>::len), Some(1));
        assert!(index.docs("c.js").is_none());
    }

    #[test]
    fn add_file_counts_records() {
        let mut builder = DocIndexBuilder::new();
        let count = builder.add_file(&source(
            "app/a.js",
            "/**\n * @ngdoc module\n * @name app\n */\n/**\n * @ngdoc service\n * @name api\n */",
        ));
        assert_eq!(count, 2);
        assert_eq!(builder.add_file(&source("app/empty.js", "var x;")), 0);
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn lookup_and_grouping_after_backfill() {
        let mut builder = DocIndexBuilder::new();
        builder.add_file(&source(
            "lib/app/index.js",
            "/**\n * @ngdoc module\n * @name app\n */",
        ));
        builder.add_file(&source(
            "lib/app/api.js",
            concat!(
                "/**\n * @ngdoc service\n * @name api\n */\n",
                "/**\n * @ngdoc method\n * @name api#get\n */",
            ),
        ));
        builder.add_file(&source(
            "other/loose.js",
            "/**\n * @ngdoc filter\n * @name loose\n */",
        ));
        let mut index = builder.seal();

        assert_eq!(index.backfill_all(), 3);
        let api = index.lookup("app", "api").unwrap();
        assert_eq!(api.file, "lib/app/api.js");
        assert!(index.lookup("app", "missing").is_none());

        let groups = index.by_module();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["app"].len(), 3);

        let unresolved: Vec<_> = index.unresolved().map(|d| d.name.as_deref()).collect();
        assert_eq!(unresolved, vec![Some("loose")]);
    }
}
