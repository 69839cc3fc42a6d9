use std::collections::BTreeMap;

use rss::extension::{Extension, ExtensionBuilder};
use url::Url;

/// Element key used for the RSS enclosure descriptor.
pub const ENCLOSURE_KEY: &str = "enclosure";

/// One XML element to be merged into a rendered feed item.
///
/// Elements are either simple text elements (`<itunes:episode>4</...>`) or
/// self-closing elements carrying only attributes (`<enclosure url=.../>`,
/// `<itunes:image href=.../>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemElement {
    pub key: String,
    pub content: ElementContent,
}

/// The payload of an [`ItemElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementContent {
    Text(String),
    /// Attribute pairs in emit order.
    Attributes(Vec<(String, String)>),
}

impl ItemElement {
    /// A simple text element.
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: ElementContent::Text(value.into()),
        }
    }

    /// An `<enclosure url=... length=... type=...>` descriptor.
    pub fn enclosure(url: &Url, length: u64, mime_type: &str) -> Self {
        Self {
            key: ENCLOSURE_KEY.to_string(),
            content: ElementContent::Attributes(vec![
                ("url".to_string(), url.to_string()),
                ("length".to_string(), length.to_string()),
                ("type".to_string(), mime_type.to_string()),
            ]),
        }
    }

    /// An `<itunes:image href=...>` descriptor.
    pub fn image(href: &Url) -> Self {
        Self {
            key: "itunes:image".to_string(),
            content: ElementContent::Attributes(vec![("href".to_string(), href.to_string())]),
        }
    }

    pub fn is_enclosure(&self) -> bool {
        self.key == ENCLOSURE_KEY
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.content {
            ElementContent::Attributes(attrs) => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            ElementContent::Text(_) => None,
        }
    }

    /// The text value of a simple element.
    pub fn value(&self) -> Option<&str> {
        match &self.content {
            ElementContent::Text(value) => Some(value.as_str()),
            ElementContent::Attributes(_) => None,
        }
    }

    /// Convert an `enclosure` descriptor into the rss crate's type.
    ///
    /// Returns None for any other element key.
    pub fn to_enclosure(&self) -> Option<rss::Enclosure> {
        if !self.is_enclosure() {
            return None;
        }

        Some(rss::Enclosure {
            url: self.attr("url").unwrap_or_default().to_string(),
            length: self.attr("length").unwrap_or_default().to_string(),
            mime_type: self.attr("type").unwrap_or_default().to_string(),
        })
    }

    /// Convert an `itunes:*` descriptor into an item extension.
    ///
    /// The returned pair is the local element name (map key within the
    /// namespace) and the extension itself.
    pub fn to_extension(&self) -> (String, Extension) {
        let local_name = self
            .key
            .split_once(':')
            .map(|(_, local)| local)
            .unwrap_or(self.key.as_str())
            .to_string();

        let (value, attrs) = match &self.content {
            ElementContent::Text(value) => (Some(value.clone()), BTreeMap::new()),
            ElementContent::Attributes(pairs) => {
                (None, pairs.iter().cloned().collect::<BTreeMap<_, _>>())
            }
        };

        let extension = ExtensionBuilder::default()
            .name(self.key.clone())
            .value(value)
            .attrs(attrs)
            .build();

        (local_name, extension)
    }
}
