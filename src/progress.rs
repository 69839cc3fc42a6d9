use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted while a feed is generated, for progress reporting
#[derive(Debug, Clone)]
pub enum RenderEvent {
    /// Dataset is being fetched from URL
    FetchingDataset { url: String },

    /// Dataset bytes are being parsed
    ParsingDataset { source: String },

    /// Dataset has been loaded successfully
    DatasetLoaded {
        channel_title: String,
        total_rows: usize,
    },

    /// One feed item has been rendered
    ItemRendered {
        row_index: usize,
        title: String,
        /// Number of iTunes/enclosure elements merged into the item
        itunes_elements: usize,
    },

    /// A row was rendered without iTunes enrichment
    ItunesSkipped {
        row_index: usize,
        title: String,
        reason: String,
    },

    /// A configured tag could not be resolved for a row
    TagOmitted {
        row_index: usize,
        tag: String,
        reason: String,
    },

    /// The feed document has been written to disk
    FeedWritten { path: PathBuf, items: usize },

    /// Generation completed
    GenerateCompleted {
        item_count: usize,
        enriched_count: usize,
        skipped_count: usize,
        omission_count: usize,
    },
}

/// Trait for reporting render events during feed generation.
///
/// Implementations can use this to print console output, log messages,
/// or collect statistics.
pub trait Reporter: Send + Sync {
    /// Report a render event
    fn report(&self, event: RenderEvent);
}

/// A shared reference to a reporter
pub type SharedReporter = Arc<dyn Reporter>;

/// A no-op reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _event: RenderEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedReporter {
        Arc::new(Self)
    }
}
