//! `data:` URIs, the form in which uploaded documents are handed to flows.

use base64::{engine::general_purpose, Engine as _};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUriError {
    #[error("not a data URI")]
    MissingScheme,
    #[error("data URI has no ',' separator")]
    MissingPayload,
    #[error("only base64 data URIs are supported")]
    NotBase64,
    #[error("invalid base64 payload")]
    InvalidPayload,
}

/// A decoded `data:<mime>;base64,<payload>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub data: Vec<u8>,
}

impl DataUri {
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }

    /// Media types whose payload can be embedded into a prompt as text.
    pub fn is_textual(&self) -> bool {
        let mime = self.mime.to_ascii_lowercase();
        mime.starts_with("text/")
            || mime == "application/json"
            || mime == "application/xml"
            || mime.ends_with("+json")
            || mime.ends_with("+xml")
    }

    /// The payload as UTF-8 text, if it is textual and valid UTF-8.
    pub fn text(&self) -> Option<String> {
        if !self.is_textual() {
            return None;
        }
        String::from_utf8(self.data.clone()).ok()
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data:{};base64,{}",
            self.mime,
            general_purpose::STANDARD.encode(&self.data)
        )
    }
}

impl FromStr for DataUri {
    type Err = DataUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .trim()
            .strip_prefix("data:")
            .ok_or(DataUriError::MissingScheme)?;
        let (meta, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;
        let meta = meta.strip_suffix(";base64").ok_or(DataUriError::NotBase64)?;

        let mime = meta.split(';').next().unwrap_or_default().trim();
        let mime = if mime.is_empty() { "text/plain" } else { mime };

        let data = general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|_| DataUriError::InvalidPayload)?;

        Ok(DataUri::new(mime, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_textual_uri_with_charset() {
        let uri: DataUri = "data:text/plain;charset=utf-8;base64,SGVsbG8=".parse().unwrap();
        assert_eq!(uri.mime, "text/plain");
        assert_eq!(uri.text().as_deref(), Some("Hello"));
    }

    #[test]
    fn encodes_to_standard_form() {
        let uri = DataUri::new("text/markdown", b"# Lease".to_vec());
        let encoded = uri.to_string();
        assert_eq!(encoded, "data:text/markdown;base64,IyBMZWFzZQ==");
        assert_eq!(encoded.parse::<DataUri>().unwrap(), uri);
    }

    #[test]
    fn empty_mime_defaults_to_plain_text() {
        let uri: DataUri = "data:;base64,eA==".parse().unwrap();
        assert_eq!(uri.mime, "text/plain");
    }

    #[test]
    fn binary_media_is_not_textual() {
        let uri = DataUri::new("application/pdf", vec![0x25, 0x50, 0x44, 0x46]);
        assert!(!uri.is_textual());
        assert_eq!(uri.text(), None);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!("text/plain,abc".parse::<DataUri>(), Err(DataUriError::MissingScheme));
        assert_eq!("data:text/plain;base64".parse::<DataUri>(), Err(DataUriError::MissingPayload));
        assert_eq!("data:text/plain,abc".parse::<DataUri>(), Err(DataUriError::NotBase64));
        assert_eq!(
            "data:text/plain;base64,@@@".parse::<DataUri>(),
            Err(DataUriError::InvalidPayload)
        );
    }
}
