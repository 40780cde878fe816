//! Wire types for the Kythe HTTP JSON API.
//!
//! Proto3 JSON omits zero-valued fields, so every numeric and repeated field
//! defaults when absent. Byte payloads travel as standard base64.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize, Serializer};

/// Fact name selecting a node's kind in search requests.
pub const NODE_KIND_FACT: &str = "/kythe/node/kind";
/// Edge kinds describing structure rather than usage.
pub const EDGE_DOCUMENTS: &str = "/kythe/edge/documents";
pub const EDGE_DEFINES: &str = "/kythe/edge/defines";

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchRequest {
    pub partial: PartialVName,
    pub fact: Vec<Fact>,
    pub partial_prefix: PartialVName,
}

impl SearchRequest {
    /// Search for the file node at `path`.
    pub fn file(path: &str) -> Self {
        Self {
            partial: PartialVName {
                path: Some(path.to_string()),
            },
            fact: vec![Fact {
                name: NODE_KIND_FACT.to_string(),
                value: b"file".to_vec(),
            }],
            partial_prefix: PartialVName::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PartialVName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Fact {
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchReply {
    #[serde(default)]
    pub ticket: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub ticket: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecorationsRequest {
    pub location: Location,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "base64_bytes::serialize_opt"
    )]
    pub dirty_buffer: Option<Vec<u8>>,
    pub references: bool,
    pub source_text: bool,
}

impl DecorationsRequest {
    /// References for `ticket`, positioned against the unsaved editor text.
    pub fn references(ticket: &str, dirty_buffer: Option<&str>) -> Self {
        Self {
            location: Location {
                ticket: ticket.to_string(),
            },
            dirty_buffer: dirty_buffer.map(|text| text.as_bytes().to_vec()),
            references: true,
            source_text: false,
        }
    }

    /// Full source text of `ticket`, without references.
    pub fn source_text(ticket: &str) -> Self {
        Self {
            location: Location {
                ticket: ticket.to_string(),
            },
            dirty_buffer: None,
            references: false,
            source_text: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecorationsReply {
    /// Base64-encoded file content, present when requested.
    #[serde(default)]
    pub source_text: Option<String>,
    #[serde(default)]
    pub reference: Vec<Reference>,
}

impl DecorationsReply {
    /// Decode the source text payload.
    pub fn decode_source_text(&self) -> Result<Option<String>, base64::DecodeError> {
        self.source_text
            .as_deref()
            .map(|encoded| {
                let bytes = STANDARD.decode(encoded.as_bytes())?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            })
            .transpose()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub target_ticket: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub anchor_start: Point,
    #[serde(default)]
    pub anchor_end: Point,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub byte_offset: usize,
    #[serde(default)]
    pub line_number: u32,
    #[serde(default)]
    pub column_offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    None = 0,
    Full = 1,
    Binding = 2,
    All = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    None = 0,
    All = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentationKind {
    None = 0,
    All = 1,
}

macro_rules! serialize_as_number {
    ($($ty:ty),*) => {
        $(impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u32(*self as u32)
            }
        })*
    };
}

serialize_as_number!(DefinitionKind, ReferenceKind, DocumentationKind);

#[derive(Debug, Clone, Serialize)]
pub struct CrossReferencesRequest {
    pub ticket: Vec<String>,
    pub definition_kind: DefinitionKind,
    pub reference_kind: ReferenceKind,
    pub documentation_kind: DocumentationKind,
    pub anchor_text: bool,
}

impl CrossReferencesRequest {
    /// Definitions, references and documentation for `ticket`.
    pub fn for_target(ticket: &str) -> Self {
        Self {
            ticket: vec![ticket.to_string()],
            definition_kind: DefinitionKind::All,
            reference_kind: ReferenceKind::All,
            documentation_kind: DocumentationKind::All,
            anchor_text: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossReferencesReply {
    #[serde(default)]
    pub cross_references: HashMap<String, CrossReferenceSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossReferenceSet {
    #[serde(default)]
    pub definition: Vec<DefinitionEntry>,
    #[serde(default)]
    pub documentation: Vec<DocumentationEntry>,
}

/// A definition anchor; `parent` is the locator of the file holding it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DefinitionEntry {
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub start: Point,
    #[serde(default)]
    pub snippet: String,
}

/// A documentation anchor; `parent` carries the language tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentationEntry {
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub text: String,
}

/// Standard base64 encoding for outgoing byte payloads.
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn serialize_opt<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serialize(bytes, serializer),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_request_encodes_fact_value() {
        let request = serde_json::to_value(SearchRequest::file("foo/Bar.java")).unwrap();
        assert_eq!(
            request,
            json!({
                "partial": {"path": "foo/Bar.java"},
                "fact": [{"name": "/kythe/node/kind", "value": "ZmlsZQ=="}],
                "partial_prefix": {}
            })
        );
    }

    #[test]
    fn decorations_request_encodes_dirty_buffer() {
        let request =
            serde_json::to_value(DecorationsRequest::references("kythe:?path=a", Some("hi")))
                .unwrap();
        assert_eq!(
            request,
            json!({
                "location": {"ticket": "kythe:?path=a"},
                "dirty_buffer": "aGk=",
                "references": true,
                "source_text": false
            })
        );

        let request = serde_json::to_value(DecorationsRequest::source_text("t")).unwrap();
        assert!(request.get("dirty_buffer").is_none());
    }

    #[test]
    fn xrefs_request_uses_numeric_kinds() {
        let request = serde_json::to_value(CrossReferencesRequest::for_target("kythe:#x")).unwrap();
        assert_eq!(
            request,
            json!({
                "ticket": ["kythe:#x"],
                "definition_kind": 3,
                "reference_kind": 1,
                "documentation_kind": 1,
                "anchor_text": true
            })
        );
    }

    #[test]
    fn decorations_reply_defaults_missing_offsets() {
        let reply: DecorationsReply = serde_json::from_value(json!({
            "source_text": "YWIK",
            "reference": [{
                "target_ticket": "kythe:#t",
                "kind": "/kythe/edge/ref",
                "anchor_start": {"byte_offset": 3, "line_number": 1},
                "anchor_end": {"byte_offset": 7, "line_number": 1, "column_offset": 7}
            }]
        }))
        .unwrap();

        assert_eq!(reply.decode_source_text().unwrap().as_deref(), Some("ab\n"));
        let r = &reply.reference[0];
        assert_eq!(r.anchor_start.column_offset, 0);
        assert_eq!(r.anchor_end.column_offset, 7);
    }

    #[test]
    fn rejects_invalid_base64() {
        let reply: DecorationsReply =
            serde_json::from_value(json!({"source_text": "***"})).unwrap();
        assert!(reply.decode_source_text().is_err());
        assert_eq!(DecorationsReply::default().decode_source_text().unwrap(), None);
    }

    #[test]
    fn empty_replies_parse() {
        let reply: SearchReply = serde_json::from_value(json!({})).unwrap();
        assert!(reply.ticket.is_empty());
        let reply: CrossReferencesReply = serde_json::from_value(json!({})).unwrap();
        assert!(reply.cross_references.is_empty());
    }
}
