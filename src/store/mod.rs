mod dataset;
mod entity;

pub use dataset::{
    ChannelMeta, Dataset, fetch_dataset_bytes, is_url, load_dataset, parse_dataset,
    read_dataset_file,
};
pub use entity::{
    ContentEntity, EntityRef, FieldValue, FileEntity, MediaEntity, parse_pub_date,
};

/// Lookup seam over the entity storage backing a feed render.
///
/// The production implementation is [`Dataset`]; tests supply small inline
/// stores.
pub trait EntityStore {
    /// Look up a media entity by id.
    fn media(&self, id: &str) -> Option<&MediaEntity>;

    /// Look up a file entity by id.
    fn file(&self, id: &str) -> Option<&FileEntity>;
}
