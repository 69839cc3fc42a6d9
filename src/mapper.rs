use std::fmt;

use url::Url;

use crate::element::ItemElement;
use crate::mapping::FieldMapping;
use crate::row::RowContext;
use crate::store::{EntityStore, FieldValue};
use crate::tags::ItunesTag;

/// How the configured enclosure field's shape is interpreted.
///
/// Classified once per row from the field value itself, instead of
/// inspecting storage types at every access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnclosureFieldKind {
    /// The field references a media entity; the enclosure comes from the
    /// media's source file.
    MediaReference,
    /// The field references files directly; the first one wins.
    DirectFile,
    /// Any other shape. Not an error, the enclosure is simply skipped.
    Unsupported,
}

impl EnclosureFieldKind {
    pub fn classify(value: Option<&FieldValue>) -> Self {
        match value {
            Some(FieldValue::Media { .. }) => EnclosureFieldKind::MediaReference,
            Some(FieldValue::Files { .. }) => EnclosureFieldKind::DirectFile,
            _ => EnclosureFieldKind::Unsupported,
        }
    }
}

/// Why a configured element was not emitted for a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmitReason {
    /// The row has no media relationship; iTunes enrichment was skipped.
    NoMediaRelationship,
    /// The referenced media entity does not exist.
    MediaNotFound(String),
    /// The media's source file (or a directly referenced file) is missing.
    FileNotFound(String),
    /// The file exists but no absolute URL could be built for it.
    UnresolvableUrl(String),
}

impl fmt::Display for OmitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OmitReason::NoMediaRelationship => write!(f, "row has no media relationship"),
            OmitReason::MediaNotFound(id) => write!(f, "media entity '{id}' not found"),
            OmitReason::FileNotFound(id) => write!(f, "file entity '{id}' not found"),
            OmitReason::UnresolvableUrl(uri) => write!(f, "no absolute URL for '{uri}'"),
        }
    }
}

/// A recorded omission: which tag (None for a row-level skip) and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Omission {
    pub tag: Option<ItunesTag>,
    pub reason: OmitReason,
}

/// The mapper's output for one row: ordered element descriptors plus any
/// recorded omissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowElements {
    pub elements: Vec<ItemElement>,
    pub omitted: Vec<Omission>,
}

impl RowElements {
    fn skipped(reason: OmitReason) -> Self {
        Self {
            elements: Vec::new(),
            omitted: vec![Omission { tag: None, reason }],
        }
    }
}

/// Translates configured content fields into iTunes item elements.
///
/// Stateless: borrows the mapping, the entity store, and the base URL used
/// to absolutize file URIs. All per-row state lives in the [`RowContext`]
/// and the caller-supplied row ordinal.
pub struct ItunesFieldMapper<'a, S> {
    mapping: &'a FieldMapping,
    store: &'a S,
    base_url: &'a Url,
}

impl<'a, S: EntityStore> ItunesFieldMapper<'a, S> {
    pub fn new(mapping: &'a FieldMapping, store: &'a S, base_url: &'a Url) -> Self {
        Self {
            mapping,
            store,
            base_url,
        }
    }

    /// The supported item tags, in render order.
    pub fn item_tags() -> &'static [ItunesTag] {
        &ItunesTag::ALL
    }

    /// Resolve the `<enclosure>` descriptor for a row, if one is configured
    /// and resolvable.
    ///
    /// Unset mapping, unsupported field shape, or any missing media/file
    /// resolves to None without an error.
    pub fn resolve_enclosure(&self, row: &RowContext<'_>) -> Option<ItemElement> {
        let field = self.mapping.enclosure_field()?;
        let value = row.entity().field(field);

        let file = match EnclosureFieldKind::classify(value) {
            EnclosureFieldKind::MediaReference => {
                // The relationship entry for the field carries the media
                // entity; fall back to the reference stored in the field
                // value itself.
                let media_id = row.relationship_media_id(field).or(match value {
                    Some(FieldValue::Media { media }) => Some(media.as_str()),
                    _ => None,
                })?;
                let media = self.store.media(media_id)?;
                self.store.file(&media.source_file)?
            }
            EnclosureFieldKind::DirectFile => {
                let Some(FieldValue::Files { files }) = value else {
                    return None;
                };
                self.store.file(files.first()?)?
            }
            EnclosureFieldKind::Unsupported => return None,
        };

        let url = file.absolute_url(self.base_url).ok()?;
        Some(ItemElement::enclosure(&url, file.size, &file.mime_type))
    }

    /// Resolve the `itunes:*` descriptors for a row, in tag order.
    ///
    /// Tags whose mapped field is unset or yields an empty value are
    /// omitted without a record. An image whose media chain cannot be
    /// resolved is omitted with a record.
    pub fn resolve_tags(&self, row: &RowContext<'_>, row_index: usize) -> RowElements {
        let mut resolved = RowElements::default();

        for tag in ItunesTag::ALL {
            let Some(field) = self.mapping.field_for(tag) else {
                continue;
            };
            let Some(value) = row.field_text(row_index, field) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }

            if tag == ItunesTag::Image {
                match self.resolve_image(value) {
                    Ok(element) => resolved.elements.push(element),
                    Err(reason) => resolved.omitted.push(Omission {
                        tag: Some(tag),
                        reason,
                    }),
                }
            } else {
                resolved
                    .elements
                    .push(ItemElement::text(tag.element_name(), value));
            }
        }

        resolved
    }

    /// The full per-row pass: gating, then enclosure, then tags.
    ///
    /// Rows without a media relationship short-circuit to an empty result
    /// with a recorded row-level skip; the base RSS item is left untouched.
    pub fn apply(&self, row: &RowContext<'_>, row_index: usize) -> RowElements {
        if !row.has_media_relationship() {
            return RowElements::skipped(OmitReason::NoMediaRelationship);
        }

        let mut result = RowElements::default();
        if let Some(enclosure) = self.resolve_enclosure(row) {
            result.elements.push(enclosure);
        }

        let tags = self.resolve_tags(row, row_index);
        result.elements.extend(tags.elements);
        result.omitted.extend(tags.omitted);
        result
    }

    fn resolve_image(&self, media_id: &str) -> Result<ItemElement, OmitReason> {
        let media = self
            .store
            .media(media_id)
            .ok_or_else(|| OmitReason::MediaNotFound(media_id.to_string()))?;
        let file = self
            .store
            .file(&media.source_file)
            .ok_or_else(|| OmitReason::FileNotFound(media.source_file.clone()))?;
        let url = file
            .absolute_url(self.base_url)
            .map_err(|_| OmitReason::UnresolvableUrl(file.uri.clone()))?;
        Ok(ItemElement::image(&url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ContentEntity, EntityRef, FileEntity, MediaEntity};

    struct InMemoryStore {
        media: Vec<MediaEntity>,
        files: Vec<FileEntity>,
    }

    impl EntityStore for InMemoryStore {
        fn media(&self, id: &str) -> Option<&MediaEntity> {
            self.media.iter().find(|media| media.id == id)
        }

        fn file(&self, id: &str) -> Option<&FileEntity> {
            self.files.iter().find(|file| file.id == id)
        }
    }

    fn make_store() -> InMemoryStore {
        InMemoryStore {
            media: vec![
                MediaEntity {
                    id: "m-audio".to_string(),
                    source_file: "f-audio".to_string(),
                },
                MediaEntity {
                    id: "m-cover".to_string(),
                    source_file: "f-cover".to_string(),
                },
                MediaEntity {
                    id: "m-broken".to_string(),
                    source_file: "f-missing".to_string(),
                },
            ],
            files: vec![
                FileEntity {
                    id: "f-audio".to_string(),
                    uri: "public://a.mp3".to_string(),
                    size: 1024,
                    mime_type: "audio/mpeg".to_string(),
                },
                FileEntity {
                    id: "f-cover".to_string(),
                    uri: "http://example.com/cover.jpg".to_string(),
                    size: 2048,
                    mime_type: "image/jpeg".to_string(),
                },
            ],
        }
    }

    fn make_row_entity() -> ContentEntity {
        let mut entity = ContentEntity {
            id: "row-1".to_string(),
            title: "Episode One".to_string(),
            link: None,
            description: None,
            pub_date: None,
            guid: None,
            fields: Default::default(),
            relationships: Default::default(),
        };
        entity
            .relationships
            .insert("field_audio".to_string(), EntityRef::new("media:m-audio"));
        entity.fields.insert(
            "field_title".to_string(),
            FieldValue::Text("Episode One".to_string()),
        );
        entity.fields.insert(
            "field_cover".to_string(),
            FieldValue::Media {
                media: "m-cover".to_string(),
            },
        );
        entity
    }

    fn base_url() -> Url {
        Url::parse("http://example.com/").unwrap()
    }

    #[test]
    fn empty_mapping_resolves_nothing() {
        let store = make_store();
        let mapping = FieldMapping::default();
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let entity = make_row_entity();
        let row = RowContext::new(&entity);

        assert!(mapper.resolve_enclosure(&row).is_none());
        let resolved = mapper.resolve_tags(&row, 0);
        assert!(resolved.elements.is_empty());
        assert!(resolved.omitted.is_empty());
    }

    #[test]
    fn direct_file_enclosure_emits_url_length_and_type() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_enclosure_field("field_file");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let mut entity = make_row_entity();
        entity.fields.insert(
            "field_file".to_string(),
            FieldValue::Files {
                files: vec!["f-audio".to_string()],
            },
        );
        let row = RowContext::new(&entity);

        let element = mapper.resolve_enclosure(&row).unwrap();
        assert_eq!(element.key, "enclosure");
        assert_eq!(element.attr("url"), Some("http://example.com/a.mp3"));
        assert_eq!(element.attr("length"), Some("1024"));
        assert_eq!(element.attr("type"), Some("audio/mpeg"));
    }

    #[test]
    fn media_reference_enclosure_matches_direct_file_output() {
        let store = make_store();
        let base = base_url();

        let mut media_mapping = FieldMapping::default();
        media_mapping.set_enclosure_field("field_audio_ref");
        let mut entity = make_row_entity();
        entity.fields.insert(
            "field_audio_ref".to_string(),
            FieldValue::Media {
                media: "m-audio".to_string(),
            },
        );
        let row = RowContext::new(&entity);
        let media_mapper = ItunesFieldMapper::new(&media_mapping, &store, &base);
        let via_media = media_mapper.resolve_enclosure(&row).unwrap();

        let mut file_mapping = FieldMapping::default();
        file_mapping.set_enclosure_field("field_file");
        let mut entity = make_row_entity();
        entity.fields.insert(
            "field_file".to_string(),
            FieldValue::Files {
                files: vec!["f-audio".to_string()],
            },
        );
        let row = RowContext::new(&entity);
        let file_mapper = ItunesFieldMapper::new(&file_mapping, &store, &base);
        let via_file = file_mapper.resolve_enclosure(&row).unwrap();

        assert_eq!(via_media, via_file);
    }

    #[test]
    fn media_reference_resolves_through_relationship_entry() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_enclosure_field("field_audio");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        // field_audio's relationship points at m-audio; the field value is a
        // media reference as well.
        let mut entity = make_row_entity();
        entity.fields.insert(
            "field_audio".to_string(),
            FieldValue::Media {
                media: "m-audio".to_string(),
            },
        );
        let row = RowContext::new(&entity);

        let element = mapper.resolve_enclosure(&row).unwrap();
        assert_eq!(element.attr("url"), Some("http://example.com/a.mp3"));
    }

    #[test]
    fn unresolvable_enclosure_is_silently_skipped() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_enclosure_field("field_file");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let mut entity = make_row_entity();
        entity.fields.insert(
            "field_file".to_string(),
            FieldValue::Files {
                files: vec!["f-missing".to_string()],
            },
        );
        let row = RowContext::new(&entity);

        assert!(mapper.resolve_enclosure(&row).is_none());
    }

    #[test]
    fn unsupported_enclosure_field_shape_is_skipped() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_enclosure_field("field_title");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let entity = make_row_entity();
        let row = RowContext::new(&entity);

        assert!(mapper.resolve_enclosure(&row).is_none());
    }

    #[test]
    fn mapped_title_is_emitted_and_unmapped_tags_are_not() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_field(ItunesTag::Title, "field_title");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let entity = make_row_entity();
        let row = RowContext::new(&entity);
        let resolved = mapper.resolve_tags(&row, 0);

        assert_eq!(resolved.elements.len(), 1);
        assert_eq!(resolved.elements[0].key, "itunes:title");
        assert_eq!(resolved.elements[0].value(), Some("Episode One"));
    }

    #[test]
    fn empty_value_emits_no_placeholder() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_field(ItunesTag::Subtitle, "field_empty");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let mut entity = make_row_entity();
        entity
            .fields
            .insert("field_empty".to_string(), FieldValue::Text(String::new()));
        let row = RowContext::new(&entity);

        let resolved = mapper.resolve_tags(&row, 0);
        assert!(resolved.elements.is_empty());
        assert!(resolved.omitted.is_empty());
    }

    #[test]
    fn image_tag_resolves_media_to_href() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_field(ItunesTag::Image, "field_cover");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let entity = make_row_entity();
        let row = RowContext::new(&entity);
        let resolved = mapper.resolve_tags(&row, 0);

        assert_eq!(resolved.elements.len(), 1);
        assert_eq!(resolved.elements[0].key, "itunes:image");
        assert_eq!(
            resolved.elements[0].attr("href"),
            Some("http://example.com/cover.jpg")
        );
    }

    #[test]
    fn unresolvable_image_is_omitted_with_record() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_field(ItunesTag::Image, "field_cover");
        mapping.set_field(ItunesTag::Title, "field_title");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let mut entity = make_row_entity();
        entity.fields.insert(
            "field_cover".to_string(),
            FieldValue::Media {
                media: "m-broken".to_string(),
            },
        );
        let row = RowContext::new(&entity);
        let resolved = mapper.resolve_tags(&row, 0);

        // The other tags still render; the image is recorded as omitted.
        assert_eq!(resolved.elements.len(), 1);
        assert_eq!(resolved.elements[0].key, "itunes:title");
        assert_eq!(
            resolved.omitted,
            vec![Omission {
                tag: Some(ItunesTag::Image),
                reason: OmitReason::FileNotFound("f-missing".to_string()),
            }]
        );
    }

    #[test]
    fn resolve_tags_is_idempotent() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_field(ItunesTag::Title, "field_title");
        mapping.set_field(ItunesTag::Image, "field_cover");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let entity = make_row_entity();
        let row = RowContext::new(&entity);

        assert_eq!(mapper.resolve_tags(&row, 0), mapper.resolve_tags(&row, 0));
    }

    #[test]
    fn apply_skips_rows_without_media_relationship() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_field(ItunesTag::Title, "field_title");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let mut entity = make_row_entity();
        entity.relationships.clear();
        let row = RowContext::new(&entity);

        let result = mapper.apply(&row, 0);
        assert!(result.elements.is_empty());
        assert_eq!(
            result.omitted,
            vec![Omission {
                tag: None,
                reason: OmitReason::NoMediaRelationship,
            }]
        );
    }

    #[test]
    fn apply_orders_enclosure_before_tags() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_enclosure_field("field_audio");
        mapping.set_field(ItunesTag::Subtitle, "field_sub");
        mapping.set_field(ItunesTag::Title, "field_title");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let mut entity = make_row_entity();
        entity.fields.insert(
            "field_audio".to_string(),
            FieldValue::Media {
                media: "m-audio".to_string(),
            },
        );
        entity.fields.insert(
            "field_sub".to_string(),
            FieldValue::Text("The first one".to_string()),
        );
        let row = RowContext::new(&entity);

        let result = mapper.apply(&row, 0);
        let keys: Vec<&str> = result.elements.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["enclosure", "itunes:subtitle", "itunes:title"]);
    }

    #[test]
    fn multi_valued_field_uses_row_ordinal() {
        let store = make_store();
        let mut mapping = FieldMapping::default();
        mapping.set_field(ItunesTag::Episode, "field_episode");
        let base = base_url();
        let mapper = ItunesFieldMapper::new(&mapping, &store, &base);

        let mut entity = make_row_entity();
        entity.fields.insert(
            "field_episode".to_string(),
            FieldValue::TextList(vec!["1".to_string(), "2".to_string()]),
        );
        let row = RowContext::new(&entity);

        let first = mapper.resolve_tags(&row, 0);
        let second = mapper.resolve_tags(&row, 1);
        let third = mapper.resolve_tags(&row, 2);

        assert_eq!(first.elements[0].value(), Some("1"));
        assert_eq!(second.elements[0].value(), Some("2"));
        assert!(third.elements.is_empty());
    }

    #[test]
    fn classify_covers_all_field_shapes() {
        assert_eq!(
            EnclosureFieldKind::classify(Some(&FieldValue::Media {
                media: "m".to_string()
            })),
            EnclosureFieldKind::MediaReference
        );
        assert_eq!(
            EnclosureFieldKind::classify(Some(&FieldValue::Files { files: vec![] })),
            EnclosureFieldKind::DirectFile
        );
        assert_eq!(
            EnclosureFieldKind::classify(Some(&FieldValue::Text("x".to_string()))),
            EnclosureFieldKind::Unsupported
        );
        assert_eq!(
            EnclosureFieldKind::classify(None),
            EnclosureFieldKind::Unsupported
        );
    }
}
