//! Parser module — file-level entry point.

pub mod chunk;
pub mod markup;
pub mod param;

pub use chunk::parse_documentation_chunk;
pub use markup::segment;
pub use param::parse_param;

use crate::model::{DocRecord, SourceFile};
use tracing::trace;

/// Parse every @ngdoc block of a file.
///
/// Returns `None` when the file has no candidate comment block at all, and
/// `Some` (possibly empty) once at least one block was examined.
pub fn parse(file: &SourceFile) -> Option<Vec<DocRecord>> {
    let is_pure_doc = file.is_pure_doc();
    let blocks = if is_pure_doc {
        vec![file.content.as_str()]
    } else {
        comment_blocks(&file.content)
    };
    if blocks.is_empty() {
        return None;
    }

    let mut records = Vec::new();
    for block in blocks {
        trace!(file = %file.file_name, len = block.len(), "examining block");
        if let Some(mut record) = parse_documentation_chunk(block, is_pure_doc, None) {
            record.file = file.file_name.clone();
            records.push(record);
        }
    }
    Some(records)
}

/// Doc comment candidates: `/` plus two or more `*`, up to (excluding) the
/// next `*`-run closed by `/`. Unterminated comments run to end of input.
fn comment_blocks(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i + 2 < bytes.len() {
        if bytes[i] != b'/' || bytes[i + 1] != b'*' || bytes[i + 2] != b'*' {
            i += 1;
            continue;
        }
        let mut body = i + 1;
        while body < bytes.len() && bytes[body] == b'*' {
            body += 1;
        }
        let end = find_comment_close(bytes, body).unwrap_or(bytes.len());
        if end > body {
            blocks.push(&content[i..end]);
            i = end;
        } else {
            i += 1;
        }
    }
    blocks
}

/// Offset of the first `*`-run at or after `from` that is followed by `/`.
fn find_comment_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut p = from;
    while p < bytes.len() {
        if bytes[p] == b'*' {
            let mut q = p;
            while q < bytes.len() && bytes[q] == b'*' {
                q += 1;
            }
            if q < bytes.len() && bytes[q] == b'/' {
                return Some(p);
            }
            p = q;
        } else {
            p += 1;
        }
    }
    None
}
