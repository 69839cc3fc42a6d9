// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::GenerateError;
use crate::feed::build_channel;
use crate::http::HttpClient;
use crate::mapping::FieldMapping;
use crate::progress::{RenderEvent, SharedReporter};
use crate::store::{fetch_dataset_bytes, is_url, parse_dataset, read_dataset_file};

/// Options for feed generation
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Maximum number of items to render (None = all)
    pub limit: Option<usize>,
    /// Base URL against which `public://` file URIs are resolved
    pub base_url: Url,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            limit: None,
            base_url: Url::parse("http://localhost/").expect("valid default base URL"),
        }
    }
}

/// Result of a generate operation
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Number of items rendered into the feed
    pub items: usize,
    /// Number of items that received iTunes elements
    pub enriched: usize,
    /// Number of rows rendered without iTunes enrichment
    pub skipped: usize,
    /// Number of configured tags that could not be resolved
    pub omissions: usize,
    /// Where the feed document was written
    pub output_path: PathBuf,
}

/// Generate an iTunes RSS feed from a content dataset
///
/// This is the main entry point for the library. It:
/// 1. Loads the dataset (from a URL or a local file)
/// 2. Renders each row into a feed item, applying the field mapping
/// 3. Serializes the channel and writes it to the output path
pub async fn generate_feed<C: HttpClient>(
    client: &C,
    dataset_source: &str,
    output_path: &Path,
    mapping: &FieldMapping,
    options: &GenerateOptions,
    reporter: SharedReporter,
) -> Result<GenerateResult, GenerateError> {
    // Load the dataset with granular progress reporting
    let dataset = if is_url(dataset_source) {
        reporter.report(RenderEvent::FetchingDataset {
            url: dataset_source.to_string(),
        });

        let bytes = fetch_dataset_bytes(client, dataset_source).await?;

        reporter.report(RenderEvent::ParsingDataset {
            source: dataset_source.to_string(),
        });
        parse_dataset(&bytes, dataset_source)?
    } else {
        reporter.report(RenderEvent::ParsingDataset {
            source: dataset_source.to_string(),
        });

        let bytes = read_dataset_file(Path::new(dataset_source))?;
        parse_dataset(&bytes, dataset_source)?
    };

    reporter.report(RenderEvent::DatasetLoaded {
        channel_title: dataset.channel.title.clone(),
        total_rows: dataset.rows.len(),
    });

    // Apply limit if specified
    let rows = match options.limit {
        Some(limit) => &dataset.rows[..dataset.rows.len().min(limit)],
        None => &dataset.rows[..],
    };

    let built = build_channel(
        &dataset.channel,
        rows,
        &dataset,
        mapping,
        &options.base_url,
        &reporter,
    );

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    xml.push_str(&built.channel.to_string());
    std::fs::write(output_path, &xml).map_err(|e| GenerateError::OutputWriteFailed {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    reporter.report(RenderEvent::FeedWritten {
        path: output_path.to_path_buf(),
        items: built.summary.items,
    });
    reporter.report(RenderEvent::GenerateCompleted {
        item_count: built.summary.items,
        enriched_count: built.summary.enriched,
        skipped_count: built.summary.skipped,
        omission_count: built.summary.omissions,
    });

    Ok(GenerateResult {
        items: built.summary.items,
        enriched: built.summary.enriched,
        skipped: built.summary.skipped,
        omissions: built.summary.omissions,
        output_path: output_path.to_path_buf(),
    })
}
