// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::http::HttpClient;

use super::EntityStore;
use super::entity::{ContentEntity, FileEntity, MediaEntity};

/// Channel-level metadata for the generated feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMeta {
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// A complete content dataset: everything one feed render reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub channel: ChannelMeta,
    /// Content rows in feed order.
    #[serde(default)]
    pub rows: Vec<ContentEntity>,
    #[serde(default)]
    pub media: Vec<MediaEntity>,
    #[serde(default)]
    pub files: Vec<FileEntity>,
}

impl Dataset {
    /// Sorted, deduplicated field names across all rows. Used to populate
    /// the mapping form's select options.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .rows
            .iter()
            .flat_map(|row| row.fields.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl EntityStore for Dataset {
    fn media(&self, id: &str) -> Option<&MediaEntity> {
        self.media.iter().find(|media| media.id == id)
    }

    fn file(&self, id: &str) -> Option<&FileEntity> {
        self.files.iter().find(|file| file.id == id)
    }
}

/// Parse dataset JSON bytes. `name` identifies the source in errors.
pub fn parse_dataset(bytes: &[u8], name: &str) -> Result<Dataset, SourceError> {
    serde_json::from_slice(bytes).map_err(|e| SourceError::ParseFailed {
        name: name.to_string(),
        source: e,
    })
}

/// Fetch raw dataset bytes from a URL (without parsing)
pub async fn fetch_dataset_bytes<C: HttpClient>(
    client: &C,
    url: &str,
) -> Result<Bytes, SourceError> {
    let bytes = client
        .get_bytes(url)
        .await
        .map_err(|e| SourceError::FetchFailed {
            url: url.to_string(),
            source: e,
        })?;
    Ok(bytes)
}

/// Read raw dataset bytes from a local file (without parsing)
pub fn read_dataset_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    std::fs::read(path).map_err(|e| SourceError::FileReadFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a dataset from a URL or a local file path.
pub async fn load_dataset<C: HttpClient>(client: &C, source: &str) -> Result<Dataset, SourceError> {
    if is_url(source) {
        let bytes = fetch_dataset_bytes(client, source).await?;
        parse_dataset(&bytes, source)
    } else {
        let bytes = read_dataset_file(Path::new(source))?;
        parse_dataset(&bytes, source)
    }
}

/// Determine if a string is a URL or a file path
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
