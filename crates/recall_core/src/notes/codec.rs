//! JSON codec for the two-field notes payload.

use serde::Serialize;
use serde_json::{Map, Value};

const BRUTE_FORCE_KEY: &str = "bruteForce";
const OPTIMIZED_KEY: &str = "optimized";

/// Structured note content for one item.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotesPayload {
    #[serde(rename = "bruteForce")]
    pub brute_force: String,
    pub optimized: String,
}

impl NotesPayload {
    pub fn new(brute_force: impl Into<String>, optimized: impl Into<String>) -> Self {
        Self {
            brute_force: brute_force.into(),
            optimized: optimized.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.brute_force.is_empty() && self.optimized.is_empty()
    }
}

/// Outcome of decoding a stored notes blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedNotes {
    /// Nothing stored.
    Empty,
    /// Blob was a JSON object; missing or non-string fields read as empty.
    Structured(NotesPayload),
    /// Blob was not a JSON object and is kept verbatim.
    FreeText(String),
}

impl DecodedNotes {
    /// Collapses any outcome into the two-field payload.
    ///
    /// Free text lands in `brute_force` with `optimized` left empty.
    pub fn into_payload(self) -> NotesPayload {
        match self {
            Self::Empty => NotesPayload::default(),
            Self::Structured(payload) => payload,
            Self::FreeText(text) => NotesPayload::new(text, ""),
        }
    }

    pub fn is_free_text(&self) -> bool {
        matches!(self, Self::FreeText(_))
    }
}

/// Decodes a stored notes blob.
pub fn decode(raw: &str) -> DecodedNotes {
    if raw.is_empty() {
        return DecodedNotes::Empty;
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => DecodedNotes::Structured(NotesPayload {
            brute_force: string_field(&fields, BRUTE_FORCE_KEY),
            optimized: string_field(&fields, OPTIMIZED_KEY),
        }),
        _ => DecodedNotes::FreeText(raw.to_string()),
    }
}

/// Decodes straight to the payload shape used by editors.
pub fn decode_payload(raw: &str) -> NotesPayload {
    decode(raw).into_payload()
}

/// Encodes the payload as compact JSON with `bruteForce` first.
pub fn encode(payload: &NotesPayload) -> serde_json::Result<String> {
    serde_json::to_string(payload)
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_payload, encode, DecodedNotes, NotesPayload};

    #[test]
    fn empty_blob_decodes_to_empty_payload() {
        assert_eq!(decode(""), DecodedNotes::Empty);
        assert_eq!(decode_payload(""), NotesPayload::default());
    }

    #[test]
    fn plain_text_falls_back_to_brute_force() {
        let decoded = decode("plain text");
        assert!(decoded.is_free_text());
        assert_eq!(
            decoded.into_payload(),
            NotesPayload::new("plain text", "")
        );
    }

    #[test]
    fn missing_fields_default_to_empty() {
        assert_eq!(
            decode(r#"{"optimized":"two pointers"}"#),
            DecodedNotes::Structured(NotesPayload::new("", "two pointers"))
        );
        assert_eq!(
            decode("{}"),
            DecodedNotes::Structured(NotesPayload::default())
        );
    }

    #[test]
    fn non_string_fields_read_as_empty() {
        assert_eq!(
            decode_payload(r#"{"bruteForce":42,"optimized":"ok"}"#),
            NotesPayload::new("", "ok")
        );
    }

    #[test]
    fn json_scalars_and_arrays_are_free_text() {
        for raw in ["42", "\"quoted\"", "[1,2]", "null", "{broken"] {
            assert_eq!(decode(raw), DecodedNotes::FreeText(raw.to_string()));
        }
    }

    #[test]
    fn encode_is_stable_and_ordered() {
        let payload = NotesPayload::new("nested loops", "hash map");
        assert_eq!(
            encode(&payload).unwrap(),
            r#"{"bruteForce":"nested loops","optimized":"hash map"}"#
        );
        assert_eq!(encode(&payload).unwrap(), encode(&payload.clone()).unwrap());
    }

    #[test]
    fn decode_inverts_encode() {
        let samples = [
            NotesPayload::default(),
            NotesPayload::new("O(n^2) scan", ""),
            NotesPayload::new("", "sliding window"),
            NotesPayload::new("quote \" and \\ backslash", "line\nbreak\ttab"),
            NotesPayload::new("{\"bruteForce\":\"x\"}", "unicode 🚀 ünï"),
            NotesPayload::new("   ", "\u{0}"),
        ];
        for payload in samples {
            assert_eq!(decode_payload(&encode(&payload).unwrap()), payload);
        }
    }
}
