//! Comment-block splitting and record building.
//!
//! A block is split into `@tag` segments, then interpreted in three passes:
//! collect the typed segments, fix the dialect (`@ngdoc`), and only then apply
//! the tag rules in source order. The `@name` rule depends on the dialect, so
//! hoisting it keeps the result independent of where `@ngdoc` appears.

use super::{markup, param};
use crate::model::{DocRecord, ParentDoc, TagKey, TagSegment};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Leading `*` of a comment line, plus the blanks around it.
static RE_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[\t ]*\*[\t ]*").unwrap());

static RE_PURE_DOC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^@[^\n\r]+").unwrap());

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)@([A-Za-z0-9_]+)\s*(.*)").unwrap());

/// Dialects whose `@name` may carry the parent as `parent#name` / `parent:name`.
const SPLIT_NAME_DIALECTS: &[&str] = &[
    "method", "property", "event", "function", "type", "overview",
];

/// Build one documentation record from a comment block.
///
/// Returns `None` when the block is not an @ngdoc block or a segment does not
/// follow the `@key content` grammar; callers skip such blocks.
pub fn parse_documentation_chunk(
    block: &str,
    is_pure_doc: bool,
    default_module: Option<&str>,
) -> Option<DocRecord> {
    let items: Vec<String> = if is_pure_doc {
        pure_doc_items(block)
    } else {
        comment_items(block)
    }
    .into_iter()
    .map(|item| RE_DECORATION.replace_all(item, "").into_owned())
    .collect();

    if !items.iter().any(|item| item.contains("@ngdoc")) {
        debug!("skipping block without @ngdoc");
        return None;
    }

    // Pass 1: typed segments.
    let segments = items
        .iter()
        .map(|item| split_tag(item, block, is_pure_doc))
        .collect::<Option<Vec<_>>>()?;

    // Pass 2: the dialect, last @ngdoc wins.
    let dialect = segments
        .iter()
        .rev()
        .find(|segment| segment.key == TagKey::Ngdoc)
        .map(|segment| segment.content.clone());

    // Pass 3: tag rules in source order.
    let mut record = DocRecord {
        ngdoc: dialect.clone(),
        ..Default::default()
    };
    let mut parent: Option<String> = None;

    for TagSegment { key, content } in segments {
        match key {
            TagKey::Param => match param::parse_param(&content) {
                Some(field) => record.params.push(field),
                None => {
                    debug!(param = %content, "skipping block with malformed @param");
                    return None;
                }
            },
            TagKey::Description => record.description = Some(markup::segment(&content)),
            TagKey::Example => record.example = Some(markup::segment(&content)),
            TagKey::Scope => {
                debug!("found @scope");
                record.scope = true;
            }
            TagKey::Owner(kind) => {
                *record.owner_mut(kind) = Some(content.clone());
                parent = Some(content);
            }
            TagKey::Name => {
                let mut name = content;
                let splits = dialect
                    .as_deref()
                    .is_some_and(|d| SPLIT_NAME_DIALECTS.contains(&d));
                if splits && name.contains(['#', ':']) {
                    let (owner, short) = {
                        let mut pieces = name.split(['#', ':']);
                        (
                            pieces.next().map(str::to_string),
                            pieces.next().unwrap_or_default().to_string(),
                        )
                    };
                    parent = owner;
                    name = short;
                } else if parent.is_none() {
                    parent = default_module.map(str::to_string);
                }
                record.name = Some(name);
            }
            TagKey::Ngdoc => record.ngdoc = Some(content),
            TagKey::Module => record.module = Some(content),
            TagKey::Other(key) => {
                record.extra.insert(key, content);
            }
        }
    }

    if !record.is_module() {
        record.parent_doc = Some(ParentDoc {
            module: record.module.clone(),
            name: parent,
        });
    }

    Some(record)
}

/// Segments of a `/** ... */` block: each starts at `*` + blanks + `@` and
/// runs up to the blanks before the next such marker.
fn comment_items(block: &str) -> Vec<&str> {
    let bytes = block.as_bytes();
    let mut items = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'*' {
            if let Some(at) = marker_at(&block[i..]) {
                let body = i + at + 1;
                let end = next_marker(block, body).unwrap_or(block.len());
                if end > body {
                    items.push(&block[i..end]);
                    i = end;
                    continue;
                }
            }
        }
        i += 1;
    }
    items
}

/// For text starting with `*`, the offset of the `@` when the text opens
/// with `*`, optional whitespace, `@`.
fn marker_at(text: &str) -> Option<usize> {
    let after = text.strip_prefix('*')?;
    let rest = after.trim_start();
    rest.starts_with('@').then(|| text.len() - rest.len())
}

/// First offset at or after `from` where whitespace, `*`, whitespace, `@`
/// begins.
fn next_marker(block: &str, from: usize) -> Option<usize> {
    block[from..].char_indices().map(|(i, _)| from + i).find(|&p| {
        let rest = block[p..].trim_start();
        rest.starts_with('*') && marker_at(rest).is_some()
    })
}

/// Pure-doc files: every line that starts with `@`.
fn pure_doc_items(block: &str) -> Vec<&str> {
    RE_PURE_DOC_LINE.find_iter(block).map(|m| m.as_str()).collect()
}

fn split_tag(item: &str, block: &str, is_pure_doc: bool) -> Option<TagSegment> {
    let item = if is_pure_doc {
        item.replacen("@description", "@description ", 1)
    } else {
        item.to_string()
    };
    let Some(caps) = RE_TAG.captures(&item) else {
        debug!(segment = %item, "skipping block with malformed tag");
        return None;
    };

    let key = &caps[1];
    let mut content = caps
        .get(2)
        .map_or("", |m| m.as_str())
        .trim_end()
        .to_string();

    // A pure-doc description is line-bounded by the splitter; take everything
    // after the tag instead.
    if is_pure_doc && key == "description" {
        if let Some((_, rest)) = block.split_once("@description") {
            content = rest.to_string();
        }
    }

    Some(TagSegment {
        key: TagKey::from_key(key),
        content,
    })
}
