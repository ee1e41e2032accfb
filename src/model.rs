//! Data model for extracted @ngdoc documentation — format-agnostic.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Extension that marks a file as pure documentation (no comment markers).
pub const PURE_DOC_EXTENSION: &str = "ngdoc";

/// Dialect marker stored in every record's `docType`.
pub const DOC_TYPE: &str = "ngdoc";

/// One input file as handed over by file discovery.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path-like identifier, also used for directory-scope lookups.
    pub file_name: String,
    pub extension: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(
        file_name: impl Into<String>,
        extension: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            extension: extension.into(),
            content: content.into(),
        }
    }

    pub fn is_pure_doc(&self) -> bool {
        self.extension == PURE_DOC_EXTENSION
    }
}

/// Known tag keys. Anything else lands in [`TagKey::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKey {
    Ngdoc,
    Name,
    Module,
    Param,
    Description,
    Example,
    Scope,
    Owner(OwnerKind),
    Other(String),
}

impl TagKey {
    pub fn from_key(key: &str) -> Self {
        match key {
            "ngdoc" => TagKey::Ngdoc,
            "name" => TagKey::Name,
            "module" => TagKey::Module,
            "param" => TagKey::Param,
            "description" => TagKey::Description,
            "example" => TagKey::Example,
            "scope" => TagKey::Scope,
            "methodOf" => TagKey::Owner(OwnerKind::MethodOf),
            "propertyOf" => TagKey::Owner(OwnerKind::PropertyOf),
            "eventOf" => TagKey::Owner(OwnerKind::EventOf),
            "memberOf" => TagKey::Owner(OwnerKind::MemberOf),
            other => TagKey::Other(other.to_string()),
        }
    }
}

/// `@methodOf` and friends: tags naming the container a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    MethodOf,
    PropertyOf,
    EventOf,
    /// Not part of the upstream dialect, used for grouping.
    MemberOf,
}

/// A single `@key content` occurrence inside a comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSegment {
    pub key: TagKey,
    pub content: String,
}

/// Documentation record built from one comment block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocRecord {
    pub doc_type: &'static str,
    /// Dialect marker (`module`, `method`, `directive`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ngdoc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<MarkupSegment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Vec<MarkupSegment>>,
    pub params: Vec<ParamField>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub scope: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_of: Option<String>,
    /// Container of this record; `None` only for module declarations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_doc: Option<ParentDoc>,
    pub file: String,
    /// Tags without a dedicated field (`returns`, `restrict`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Default for DocRecord {
    fn default() -> Self {
        Self {
            doc_type: DOC_TYPE,
            ngdoc: None,
            name: None,
            module: None,
            description: None,
            example: None,
            params: Vec::new(),
            scope: false,
            method_of: None,
            property_of: None,
            event_of: None,
            member_of: None,
            parent_doc: None,
            file: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl DocRecord {
    pub fn is_module(&self) -> bool {
        self.ngdoc.as_deref() == Some("module")
    }

    pub fn owner_mut(&mut self, kind: OwnerKind) -> &mut Option<String> {
        match kind {
            OwnerKind::MethodOf => &mut self.method_of,
            OwnerKind::PropertyOf => &mut self.property_of,
            OwnerKind::EventOf => &mut self.event_of,
            OwnerKind::MemberOf => &mut self.member_of,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParentDoc {
    pub module: Option<String>,
    pub name: Option<String>,
}

/// Parsed `@param` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamField {
    #[serde(rename = "type")]
    pub types: ParamTypes,
    pub var_name: String,
    pub alt_name: Option<String>,
    pub description: String,
    pub optional: bool,
    pub default_value: Option<String>,
}

/// The `{a|b=}` part of a parameter. Serialized as the string `"undefined"`
/// when the token is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamTypes {
    Undefined,
    Listed(Vec<ParamType>),
}

impl Serialize for ParamTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamTypes::Undefined => serializer.serialize_str("undefined"),
            ParamTypes::Listed(types) => types.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamType {
    /// Name as written, without the `=` suffix.
    pub name: String,
    /// Lower-cased category; `function` for anything mentioning it.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Output of the markup segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MarkupSegment {
    Text(String),
    Example(ExampleBlock),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExampleBlock {
    pub module: Option<String>,
    pub deps: Option<String>,
    pub files: Vec<FileBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileBlock {
    pub name: String,
    pub content: String,
    pub src: Option<String>,
}
