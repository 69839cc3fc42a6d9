// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use rss::extension::{Extension, itunes};
use rss::{Channel, Guid, Item};
use url::Url;

use crate::element::ItemElement;
use crate::mapper::ItunesFieldMapper;
use crate::mapping::FieldMapping;
use crate::progress::{RenderEvent, SharedReporter};
use crate::row::RowContext;
use crate::store::{ChannelMeta, ContentEntity, EntityStore};

/// Counters accumulated over one channel build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Items rendered into the channel.
    pub items: usize,
    /// Items that received at least one iTunes/enclosure element.
    pub enriched: usize,
    /// Rows rendered without iTunes enrichment (no media relationship).
    pub skipped: usize,
    /// Configured tags that could not be resolved.
    pub omissions: usize,
}

/// A rendered channel plus its build counters.
#[derive(Debug, Clone)]
pub struct BuiltFeed {
    pub channel: Channel,
    pub summary: BuildSummary,
}

/// Render the dataset rows into an RSS channel.
///
/// Each row becomes one item: the base RSS fields first, then whatever the
/// iTunes mapper resolves for the row. The row's position in `rows` is the
/// ordinal passed through to field-value lookups.
pub fn build_channel<S: EntityStore>(
    meta: &ChannelMeta,
    rows: &[ContentEntity],
    store: &S,
    mapping: &FieldMapping,
    base_url: &Url,
    reporter: &SharedReporter,
) -> BuiltFeed {
    let mapper = ItunesFieldMapper::new(mapping, store, base_url);
    let mut summary = BuildSummary::default();
    let mut items = Vec::with_capacity(rows.len());

    for (row_index, entity) in rows.iter().enumerate() {
        let mut row = RowContext::new(entity);
        let resolved = mapper.apply(&row, row_index);

        for omission in &resolved.omitted {
            match omission.tag {
                Some(tag) => {
                    summary.omissions += 1;
                    reporter.report(RenderEvent::TagOmitted {
                        row_index,
                        tag: tag.name().to_string(),
                        reason: omission.reason.to_string(),
                    });
                }
                None => {
                    summary.skipped += 1;
                    reporter.report(RenderEvent::ItunesSkipped {
                        row_index,
                        title: entity.title.clone(),
                        reason: omission.reason.to_string(),
                    });
                }
            }
        }

        if !resolved.elements.is_empty() {
            summary.enriched += 1;
        }
        let element_count = resolved.elements.len();
        row.append_elements(resolved.elements);

        let mut item = base_item(entity);
        merge_elements(&mut item, row.into_elements());
        items.push(item);
        summary.items += 1;

        reporter.report(RenderEvent::ItemRendered {
            row_index,
            title: entity.title.clone(),
            itunes_elements: element_count,
        });
    }

    let mut channel = Channel {
        title: meta.title.clone(),
        link: meta.link.clone(),
        description: meta.description.clone(),
        language: meta.language.clone(),
        items,
        ..Channel::default()
    };
    channel
        .namespaces
        .insert("itunes".to_string(), itunes::NAMESPACE.to_string());

    BuiltFeed { channel, summary }
}

/// The base RSS item for a row, before iTunes enrichment.
fn base_item(entity: &ContentEntity) -> Item {
    Item {
        title: Some(entity.title.clone()),
        link: entity.link.clone(),
        description: entity.description.clone(),
        pub_date: entity.parsed_pub_date().map(|dt| dt.to_rfc2822()),
        guid: entity.guid.as_ref().map(|value| Guid {
            value: value.clone(),
            permalink: false,
        }),
        ..Item::default()
    }
}

/// Merge resolved element descriptors into an item.
///
/// The enclosure descriptor becomes the item's enclosure; everything else
/// lands in the item's extension map under the `itunes` prefix, preserving
/// descriptor order.
fn merge_elements(item: &mut Item, elements: Vec<ItemElement>) {
    let mut extensions: BTreeMap<String, Vec<Extension>> = BTreeMap::new();

    for element in elements {
        if element.is_enclosure() {
            item.enclosure = element.to_enclosure();
        } else {
            let (local_name, extension) = element.to_extension();
            extensions.entry(local_name).or_default().push(extension);
        }
    }

    if !extensions.is_empty() {
        item.extensions.insert("itunes".to_string(), extensions);
    }
}
