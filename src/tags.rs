use std::fmt;

use serde::{Deserialize, Serialize};

/// The item-level iTunes tags understood by the feed renderer.
///
/// The variant order is fixed and significant: it defines both the order of
/// the configuration form controls and the order in which elements are
/// emitted into a rendered item.
///
/// See https://help.apple.com/itc/podcasts_connect/#/itcb54353390
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItunesTag {
    Subtitle,
    Summary,
    Title,
    EpisodeType,
    Episode,
    Season,
    Author,
    Explicit,
    Block,
    Duration,
    Image,
    IsClosedCaptioned,
    Order,
    Language,
}

impl ItunesTag {
    /// All supported tags, in render order.
    pub const ALL: [ItunesTag; 14] = [
        ItunesTag::Subtitle,
        ItunesTag::Summary,
        ItunesTag::Title,
        ItunesTag::EpisodeType,
        ItunesTag::Episode,
        ItunesTag::Season,
        ItunesTag::Author,
        ItunesTag::Explicit,
        ItunesTag::Block,
        ItunesTag::Duration,
        ItunesTag::Image,
        ItunesTag::IsClosedCaptioned,
        ItunesTag::Order,
        ItunesTag::Language,
    ];

    /// The tag name as Apple spells it (camelCase, no namespace prefix).
    pub fn name(&self) -> &'static str {
        match self {
            ItunesTag::Subtitle => "subtitle",
            ItunesTag::Summary => "summary",
            ItunesTag::Title => "title",
            ItunesTag::EpisodeType => "episodeType",
            ItunesTag::Episode => "episode",
            ItunesTag::Season => "season",
            ItunesTag::Author => "author",
            ItunesTag::Explicit => "explicit",
            ItunesTag::Block => "block",
            ItunesTag::Duration => "duration",
            ItunesTag::Image => "image",
            ItunesTag::IsClosedCaptioned => "isClosedCaptioned",
            ItunesTag::Order => "order",
            ItunesTag::Language => "language",
        }
    }

    /// The qualified XML element name, e.g. `itunes:episode`.
    pub fn element_name(&self) -> String {
        format!("itunes:{}", self.name())
    }

    /// The key under which this tag's field assignment is persisted,
    /// e.g. `episode_field`.
    pub fn machine_name(&self) -> String {
        format!("{}_field", self.name())
    }

    /// Look a tag up by its persisted machine name.
    pub fn from_machine_name(key: &str) -> Option<ItunesTag> {
        let name = key.strip_suffix("_field")?;
        ItunesTag::ALL.iter().copied().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for ItunesTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
