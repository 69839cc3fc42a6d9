mod form;

pub use form::{SelectControl, SelectOption, mapping_form};

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tags::ItunesTag;

/// Per-feed assignment of content fields to iTunes item tags.
///
/// Holds exactly one entry per supported tag plus the enclosure entry. An
/// empty string means "unset"; unset tags are simply not rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMapping", into = "RawMapping")]
pub struct FieldMapping {
    enclosure_field: String,
    tags: BTreeMap<ItunesTag, String>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            enclosure_field: String::new(),
            tags: ItunesTag::ALL
                .iter()
                .map(|tag| (*tag, String::new()))
                .collect(),
        }
    }
}

impl FieldMapping {
    /// The field configured for the enclosure, if set.
    pub fn enclosure_field(&self) -> Option<&str> {
        Some(self.enclosure_field.as_str()).filter(|field| !field.is_empty())
    }

    /// The field configured for the given tag, if set.
    pub fn field_for(&self, tag: ItunesTag) -> Option<&str> {
        self.tags
            .get(&tag)
            .map(String::as_str)
            .filter(|field| !field.is_empty())
    }

    pub fn set_enclosure_field(&mut self, field: impl Into<String>) {
        self.enclosure_field = field.into();
    }

    pub fn set_field(&mut self, tag: ItunesTag, field: impl Into<String>) {
        self.tags.insert(tag, field.into());
    }

    /// True when no tag and no enclosure field is assigned.
    pub fn is_empty(&self) -> bool {
        self.enclosure_field().is_none()
            && ItunesTag::ALL.iter().all(|tag| self.field_for(*tag).is_none())
    }

    /// Load a mapping from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Persist the mapping to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// On-disk shape: the enclosure entry next to an `itunes` section keyed by
/// tag machine names.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawMapping {
    #[serde(default)]
    enclosure_field: String,
    #[serde(default)]
    itunes: BTreeMap<String, String>,
}

impl TryFrom<RawMapping> for FieldMapping {
    type Error = ConfigError;

    fn try_from(raw: RawMapping) -> Result<Self, Self::Error> {
        let mut mapping = FieldMapping::default();
        mapping.enclosure_field = raw.enclosure_field;

        for (key, field) in raw.itunes {
            let tag = ItunesTag::from_machine_name(&key)
                .ok_or(ConfigError::UnknownMappingKey { key })?;
            mapping.tags.insert(tag, field);
        }

        Ok(mapping)
    }
}

impl From<FieldMapping> for RawMapping {
    fn from(mapping: FieldMapping) -> Self {
        RawMapping {
            enclosure_field: mapping.enclosure_field,
            itunes: mapping
                .tags
                .into_iter()
                .map(|(tag, field)| (tag.machine_name(), field))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_mapping_is_fully_unset() {
        let mapping = FieldMapping::default();

        assert!(mapping.is_empty());
        assert!(mapping.enclosure_field().is_none());
        for tag in ItunesTag::ALL {
            assert!(mapping.field_for(tag).is_none());
        }
    }

    #[test]
    fn empty_string_counts_as_unset() {
        let mut mapping = FieldMapping::default();
        mapping.set_field(ItunesTag::Title, "");
        assert!(mapping.field_for(ItunesTag::Title).is_none());
    }

    #[test]
    fn assigned_fields_are_returned() {
        let mut mapping = FieldMapping::default();
        mapping.set_field(ItunesTag::Title, "field_title");
        mapping.set_enclosure_field("field_audio");

        assert_eq!(mapping.field_for(ItunesTag::Title), Some("field_title"));
        assert_eq!(mapping.enclosure_field(), Some("field_audio"));
        assert!(!mapping.is_empty());
    }

    #[test]
    fn mapping_parses_machine_name_keys() {
        let json = r#"{
            "enclosure_field": "field_audio",
            "itunes": {
                "subtitle_field": "field_subtitle",
                "episodeType_field": "field_type"
            }
        }"#;

        let mapping: FieldMapping = serde_json::from_str(json).unwrap();

        assert_eq!(mapping.enclosure_field(), Some("field_audio"));
        assert_eq!(
            mapping.field_for(ItunesTag::Subtitle),
            Some("field_subtitle")
        );
        assert_eq!(mapping.field_for(ItunesTag::EpisodeType), Some("field_type"));
        assert!(mapping.field_for(ItunesTag::Summary).is_none());
    }

    #[test]
    fn unknown_mapping_key_is_rejected() {
        let json = r#"{"itunes": {"banner_field": "field_banner"}}"#;
        let result: Result<FieldMapping, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn serialization_always_carries_every_tag_entry() {
        let mapping = FieldMapping::default();
        let json = serde_json::to_value(&mapping).unwrap();

        let itunes = json.get("itunes").and_then(|v| v.as_object()).unwrap();
        assert_eq!(itunes.len(), ItunesTag::ALL.len());
        assert!(json.get("enclosure_field").is_some());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mapping.json");

        let mut mapping = FieldMapping::default();
        mapping.set_field(ItunesTag::Duration, "field_duration");
        mapping.set_enclosure_field("field_audio");

        mapping.save(&path).unwrap();
        let read_back = FieldMapping::load(&path).unwrap();

        assert_eq!(read_back, mapping);
    }

    #[test]
    fn load_nonexistent_returns_error() {
        let dir = tempdir().unwrap();
        let result = FieldMapping::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }
}
