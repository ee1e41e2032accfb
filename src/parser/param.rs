//! `@param` grammar: `{type1|type2=} [name|alt=default] description`.

use crate::model::{ParamField, ParamType, ParamTypes};
use regex::Regex;
use std::sync::LazyLock;

static RE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(\{([^}]+)\})?\s*([\[\]=\w|]+)\s+(.+)").unwrap()
});

/// Parse the content of a `@param` tag. Returns `None` when the text does not
/// match the grammar.
pub fn parse_param(raw: &str) -> Option<ParamField> {
    let caps = RE_PARAM.captures(raw)?;

    let mut optional = false;
    let types = match caps.get(2) {
        Some(list) => ParamTypes::Listed(
            list.as_str()
                .split('|')
                .map(|entry| {
                    let name = match entry.split_once('=') {
                        Some((name, _)) => {
                            optional = true;
                            name
                        }
                        None => entry,
                    };
                    let kind = if name.contains("function") { "function" } else { name };
                    ParamType {
                        name: name.to_string(),
                        kind: kind.to_lowercase(),
                    }
                })
                .collect(),
        ),
        None => ParamTypes::Undefined,
    };

    let mut var_name = caps[3].replacen('[', "", 1).replacen(']', "", 1);
    let mut alt_name = None;
    if let Some((first, second)) = var_name.split_once('|') {
        // Anything past a second `|` is dropped.
        let second = second.split('|').next().unwrap_or_default().to_string();
        alt_name = Some(second);
        var_name = first.to_string();
    }

    let mut default_value = None;
    if let Some((name, default)) = var_name.split_once('=') {
        default_value = Some(default.to_string());
        var_name = name.to_string();
    }

    Some(ParamField {
        types,
        var_name,
        alt_name,
        description: caps[4].to_string(),
        optional,
        default_value,
    })
}
