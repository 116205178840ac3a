//! # Instance Metadata
//!
//! The status document served at `/metadata` by a SecureDrop instance.

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// Decoded status document of a reachable instance.
///
/// `sd_version` and `gpg_fpr` must be present for a payload to decode. Unknown
/// fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "sd_version")]
    pub version: String,
    #[serde(rename = "gpg_fpr")]
    pub fingerprint: String,
    #[serde(default)]
    pub supported_languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v3_source_url: Option<String>,
}

impl Metadata {
    pub fn decode(body: &str) -> Result<Self, ProbeError> {
        serde_json::from_str(body).map_err(|e| ProbeError::Decode(e.to_string()))
    }

    /// Locale codes joined by a single space, `""` when none are advertised.
    pub fn languages_joined(&self) -> String {
        self.supported_languages.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_document() {
        let md = Metadata::decode(r#"{"sd_version":"0.6","gpg_fpr":"ABC123"}"#).unwrap();
        assert_eq!(md.version, "0.6");
        assert_eq!(md.fingerprint, "ABC123");
        assert!(md.supported_languages.is_empty());
        assert_eq!(md.server_os, None);
    }

    #[test]
    fn decodes_full_document_and_ignores_unknown_fields() {
        let body = r#"{
            "sd_version": "2.6.0",
            "gpg_fpr": "DEADBEEF",
            "server_os": "20.04",
            "v3_source_url": "abc.onion",
            "supported_languages": ["en_US", "de_DE"],
            "allow_document_uploads": true
        }"#;
        let md = Metadata::decode(body).unwrap();
        assert_eq!(md.supported_languages, vec!["en_US", "de_DE"]);
        assert_eq!(md.languages_joined(), "en_US de_DE");
        assert_eq!(md.server_os.as_deref(), Some("20.04"));
    }

    #[test]
    fn missing_fingerprint_is_a_decode_error() {
        let err = Metadata::decode(r#"{"sd_version":"0.6"}"#).unwrap_err();
        assert!(matches!(err, ProbeError::Decode(_)));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = Metadata::decode("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(err.to_string().starts_with("malformed metadata"));
    }
}
