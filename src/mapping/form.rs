use serde::Serialize;

use crate::tags::ItunesTag;

use super::FieldMapping;

/// One option in a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Description of one select control in the mapping configuration form.
#[derive(Debug, Clone, Serialize)]
pub struct SelectControl {
    /// Persisted key this control edits.
    pub name: String,
    pub title: String,
    pub description: String,
    pub options: Vec<SelectOption>,
    /// Currently assigned value, empty when unset.
    pub default: String,
}

/// Build the configuration form schema for a mapping.
///
/// One select for the enclosure field followed by one per supported tag, in
/// registry order. Every control offers the available field names prefixed
/// with a "- None -" option, and defaults to the mapping's current value.
pub fn mapping_form(mapping: &FieldMapping, available_fields: &[String]) -> Vec<SelectControl> {
    let options: Vec<SelectOption> = std::iter::once(SelectOption {
        value: String::new(),
        label: "- None -".to_string(),
    })
    .chain(available_fields.iter().map(|field| SelectOption {
        value: field.clone(),
        label: field.clone(),
    }))
    .collect();

    let mut controls = vec![SelectControl {
        name: "enclosure_field".to_string(),
        title: "Enclosure field".to_string(),
        description: "Describes a media object that is attached to the item. \
                      This must be a file field or a media entity reference."
            .to_string(),
        options: options.clone(),
        default: mapping.enclosure_field().unwrap_or_default().to_string(),
    }];

    for tag in ItunesTag::ALL {
        controls.push(SelectControl {
            name: tag.machine_name(),
            title: format!("iTunes {tag} field"),
            description: format!(
                "The itunes:{tag} field. If set to none, field will not be rendered."
            ),
            options: options.clone(),
            default: mapping.field_for(tag).unwrap_or_default().to_string(),
        });
    }

    controls
}
