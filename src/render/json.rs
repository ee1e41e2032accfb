//! JSON renderers — structured output for the rendering layer.
//!
//! Records serialize to the camelCase shape consumed by doc templates:
//! `docType`, `parentDoc`, `params[].varName`, with unknown tags flattened
//! into the record.

use crate::model::DocRecord;
use crate::render::Renderer;
use anyhow::Result;

/// A JSON array per file.
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, docs: &[DocRecord]) -> Result<String> {
        let mut out = if self.pretty {
            serde_json::to_string_pretty(docs)?
        } else {
            serde_json::to_string(docs)?
        };
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

/// One JSON object per line.
pub struct JsonLinesRenderer;

impl Renderer for JsonLinesRenderer {
    fn render(&self, docs: &[DocRecord]) -> Result<String> {
        let mut out = String::new();
        for doc in docs {
            out.push_str(&serde_json::to_string(doc)?);
            out.push('\n');
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "jsonl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParamField, ParamTypes, ParentDoc};
    use serde_json::{json, Value};

    fn sample() -> DocRecord {
        let mut doc = DocRecord {
            ngdoc: Some("method".to_string()),
            name: Some("get".to_string()),
            module: Some("ng".to_string()),
            method_of: Some("$http".to_string()),
            params: vec![ParamField {
                types: ParamTypes::Undefined,
                var_name: "url".to_string(),
                alt_name: None,
                description: "Target".to_string(),
                optional: false,
                default_value: None,
            }],
            parent_doc: Some(ParentDoc {
                module: Some("ng".to_string()),
                name: Some("$http".to_string()),
            }),
            file: "src/http.js".to_string(),
            ..Default::default()
        };
        doc.extra.insert("returns".to_string(), "{Promise} result".to_string());
        doc
    }

    #[test]
    fn record_shape() {
        let out = JsonRenderer { pretty: false }.render(&[sample()]).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            json!([{
                "docType": "ngdoc",
                "ngdoc": "method",
                "name": "get",
                "module": "ng",
                "params": [{
                    "type": "undefined",
                    "varName": "url",
                    "altName": null,
                    "description": "Target",
                    "optional": false,
                    "defaultValue": null
                }],
                "methodOf": "$http",
                "parentDoc": { "module": "ng", "name": "$http" },
                "file": "src/http.js",
                "returns": "{Promise} result"
            }])
        );
    }

    #[test]
    fn json_lines_one_per_record() {
        let out = JsonLinesRenderer.render(&[sample(), sample()]).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().all(|l| l.starts_with("{\"docType\":\"ngdoc\"")));
    }
}
