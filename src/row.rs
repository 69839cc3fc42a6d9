use crate::element::ItemElement;
use crate::store::ContentEntity;

/// Transient per-row render state.
///
/// Wraps the row's entity and accumulates the XML element descriptors
/// appended while the row is rendered. Created fresh for every row and
/// discarded once its elements are merged into the feed item.
#[derive(Debug)]
pub struct RowContext<'a> {
    entity: &'a ContentEntity,
    elements: Vec<ItemElement>,
}

impl<'a> RowContext<'a> {
    pub fn new(entity: &'a ContentEntity) -> Self {
        Self {
            entity,
            elements: Vec::new(),
        }
    }

    pub fn entity(&self) -> &ContentEntity {
        self.entity
    }

    /// Ordinal field-value lookup: the text value the named field yields for
    /// the given row ordinal.
    pub fn field_text(&self, ordinal: usize, field: &str) -> Option<&str> {
        self.entity.field(field)?.text_at(ordinal)
    }

    /// The media entity id attached through the named relationship, if any.
    pub fn relationship_media_id(&self, name: &str) -> Option<&str> {
        self.entity.relationships.get(name)?.media_id()
    }

    /// Whether any relationship entity on this row is a media entity.
    ///
    /// Rows without a media relationship are rendered as plain RSS items;
    /// iTunes enrichment is skipped entirely.
    pub fn has_media_relationship(&self) -> bool {
        self.entity
            .relationships
            .values()
            .any(|reference| reference.media_id().is_some())
    }

    /// Append a descriptor to the row's element list.
    pub fn push_element(&mut self, element: ItemElement) {
        self.elements.push(element);
    }

    pub fn append_elements(&mut self, elements: impl IntoIterator<Item = ItemElement>) {
        self.elements.extend(elements);
    }

    pub fn elements(&self) -> &[ItemElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<ItemElement> {
        self.elements
    }
}
