use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RenderError;

/// A typed field value carried by a content row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Reference to a media entity.
    Media { media: String },
    /// Direct file references, in delta order.
    Files { files: Vec<String> },
    /// Single text value.
    Text(String),
    /// Multi-valued text field, one value per row ordinal.
    TextList(Vec<String>),
}

impl FieldValue {
    /// The text rendering of this field for the given row ordinal.
    ///
    /// Multi-valued fields yield their ordinal-th value; single values apply
    /// to every ordinal. A media reference yields its media id, which is how
    /// image mappings carry the entity to resolve. File references have no
    /// text rendering.
    pub fn text_at(&self, ordinal: usize) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            FieldValue::TextList(values) => values.get(ordinal).map(String::as_str),
            FieldValue::Media { media } => Some(media.as_str()),
            FieldValue::Files { .. } => None,
        }
    }
}

/// Reference to a related entity, as stored in a row's relationship map.
///
/// Serialized as `"<kind>:<id>"`, e.g. `"media:m-episode-1"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRef(String);

impl EntityRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The id of the referenced media entity, if this reference targets one.
    pub fn media_id(&self) -> Option<&str> {
        self.0.strip_prefix("media:")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One content row: the entity matched by the feed's query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntity {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Field values keyed by field name.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    /// Related entities keyed by relationship name.
    #[serde(default)]
    pub relationships: BTreeMap<String, EntityRef>,
}

impl ContentEntity {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The publication date parsed into a concrete timestamp, if present
    /// and parseable.
    pub fn parsed_pub_date(&self) -> Option<DateTime<FixedOffset>> {
        self.pub_date.as_deref().and_then(parse_pub_date)
    }
}

/// A media entity wrapping a source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaEntity {
    pub id: String,
    /// Id of the file entity holding the media's source.
    pub source_file: String,
}

/// A managed file with the metadata an enclosure needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntity {
    pub id: String,
    /// Storage URI, either `public://...` or an absolute http(s) URL.
    pub uri: String,
    /// File size in bytes.
    pub size: u64,
    pub mime_type: String,
}

impl FileEntity {
    /// Resolve the file's absolute URL.
    ///
    /// RSS feeds require absolute URLs, so `public://` URIs are resolved
    /// against the site's public file base URL. Absolute http(s) URIs pass
    /// through untouched.
    pub fn absolute_url(&self, base: &Url) -> Result<Url, RenderError> {
        if self.uri.starts_with("http://") || self.uri.starts_with("https://") {
            return Url::parse(&self.uri).map_err(|e| RenderError::InvalidFileUrl {
                uri: self.uri.clone(),
                source: e,
            });
        }

        if let Some(relative) = self.uri.strip_prefix("public://") {
            let mut base = base.clone();
            if !base.path().ends_with('/') {
                base.set_path(&format!("{}/", base.path()));
            }
            return base.join(relative).map_err(|e| RenderError::InvalidFileUrl {
                uri: self.uri.clone(),
                source: e,
            });
        }

        Err(RenderError::UnsupportedFileUri {
            uri: self.uri.clone(),
        })
    }
}

/// Parse a publication date, RFC 2822 first, then common relaxed formats.
pub fn parse_pub_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(date_str)
        .or_else(|_| DateTime::parse_from_rfc3339(date_str))
        .or_else(|_| parse_relaxed_date(date_str))
        .ok()
}

/// Try to parse dates that don't strictly conform to RFC 2822
fn parse_relaxed_date(date_str: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    // Try common alternative formats
    let formats = [
        "%a, %d %b %Y %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S %z",
    ];

    for format in formats {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Ok(dt);
        }
    }

    Err(chrono::DateTime::parse_from_rfc2822("invalid").unwrap_err())
}
