//! Renderer module — trait-based format dispatch.

pub mod json;

use crate::model::DocRecord;
use anyhow::{anyhow, Result};

/// Trait for rendering the records of one file into a specific output format.
pub trait Renderer {
    fn render(&self, docs: &[DocRecord]) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, pretty: bool) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(json::JsonRenderer { pretty })),
        "jsonl" | "ndjson" => Ok(Box::new(json::JsonLinesRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use json or jsonl", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats() {
        assert_eq!(create_renderer("json", false).unwrap().file_extension(), "json");
        assert_eq!(create_renderer("ndjson", false).unwrap().file_extension(), "jsonl");
    }

    #[test]
    fn unknown_format_is_an_error() {
        let err = create_renderer("html", false).err().unwrap();
        assert!(err.to_string().contains("unknown format: html"));
    }
}
