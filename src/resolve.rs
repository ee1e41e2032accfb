//! Module resolution by directory proximity.
//!
//! A module is declared once (`@ngdoc module`), usually in a package's entry
//! file. Records without `@module` take the nearest declaration found in their
//! own directory or, failing that, in an ancestor directory.

use crate::index::DocIndex;
use crate::model::DocRecord;
use tracing::debug;

/// Fill `module` (and an unset `parent_doc.module`) on the records of
/// `file_name` that lack one. Returns how many records were resolved.
pub fn backfill(index: &mut DocIndex, file_name: &str) -> usize {
    let Some(pos) = index.position(file_name) else {
        return 0;
    };

    // Answers come from a shared view of the whole index before any record
    // is touched.
    let view: &DocIndex = index;
    let found: Vec<(usize, String)> = view.entries[pos]
        .docs
        .iter()
        .enumerate()
        .filter(|(_, doc)| needs_module(doc))
        .filter_map(|(i, doc)| match find_module(containing_dir(&doc.file), view) {
            Some(module) => Some((i, module.to_string())),
            None => {
                debug!(file = %doc.file, name = ?doc.name, "no module declaration found");
                None
            }
        })
        .collect();

    let docs = &mut index.entries[pos].docs;
    for (i, module) in &found {
        let doc = &mut docs[*i];
        debug!(file = %doc.file, name = ?doc.name, module = %module, "resolved module");
        if let Some(parent) = doc.parent_doc.as_mut() {
            if is_unset(&parent.module) {
                parent.module = Some(module.clone());
            }
        }
        doc.module = Some(module.clone());
    }
    found.len()
}

/// A record takes part in resolution when it has a dialect marker but no module.
pub fn needs_module(doc: &DocRecord) -> bool {
    doc.ngdoc.is_some() && is_unset(&doc.module)
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Search `dir` and then its ancestors for a module declaration.
pub fn find_module<'a>(dir: &str, index: &'a DocIndex) -> Option<&'a str> {
    ScopeWalk::new(dir).find_map(|scope| module_in_scope(&scope, index))
}

/// Name of the first module record among the files directly inside `scope`.
fn module_in_scope<'a>(scope: &str, index: &'a DocIndex) -> Option<&'a str> {
    index
        .files()
        .filter(|file| is_direct_child(&file.file_name, scope))
        .flat_map(|file| file.docs.iter())
        .find(|doc| doc.is_module() && !is_unset(&doc.name))
        .and_then(|doc| doc.name.as_deref())
}

/// Directory part of a file identifier, trailing separator included.
/// `"dir/sub/b.js"` → `"dir/sub/"`, `"b.js"` → `""`.
pub fn containing_dir(file: &str) -> &str {
    file.trim_end_matches(|c: char| c != '/' && c != '\\')
}

fn is_direct_child(file: &str, dir: &str) -> bool {
    file.strip_prefix(dir)
        .is_some_and(|rest| !rest.is_empty() && !rest.contains(['/', '\\']))
}

/// Candidate directories from `start` toward the root. The walk stops after
/// the first directory with fewer than two `/` separators.
#[derive(Debug, Clone)]
pub struct ScopeWalk {
    next: Option<String>,
}

impl ScopeWalk {
    pub fn new(start: &str) -> Self {
        Self {
            next: Some(start.to_string()),
        }
    }
}

impl Iterator for ScopeWalk {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let current = self.next.take()?;
        self.next = parent_scope(&current);
        Some(current)
    }
}

fn parent_scope(dir: &str) -> Option<String> {
    if dir.matches('/').count() < 2 {
        return None;
    }
    let trimmed = dir.strip_suffix('/').unwrap_or(dir);
    let cut = trimmed.rfind('/')?;
    Some(format!("{}/", &trimmed[..cut]))
}
