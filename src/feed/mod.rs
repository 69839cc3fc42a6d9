mod build;

pub use build::{BuildSummary, BuiltFeed, build_channel};
