pub mod element;
pub mod error;
pub mod feed;
pub mod generate;
pub mod http;
pub mod mapper;
pub mod mapping;
pub mod progress;
pub mod row;
pub mod store;
pub mod tags;

// Re-export main types for convenience
pub use element::{ElementContent, ItemElement};
pub use error::{ConfigError, GenerateError, RenderError, SourceError};
pub use feed::{BuildSummary, BuiltFeed, build_channel};
pub use generate::{GenerateOptions, GenerateResult, generate_feed};
pub use http::{HttpClient, ReqwestClient};
pub use mapper::{EnclosureFieldKind, ItunesFieldMapper, OmitReason, Omission, RowElements};
pub use mapping::{FieldMapping, SelectControl, SelectOption, mapping_form};
pub use progress::{NoopReporter, RenderEvent, Reporter, SharedReporter};
pub use row::RowContext;
pub use store::{ChannelMeta, Dataset, EntityStore, is_url, load_dataset};
pub use tags::ItunesTag;
