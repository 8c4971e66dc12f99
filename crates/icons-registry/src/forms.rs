//! Per-pack settings sub-forms.

use icons_core::{PackDefinition, SettingSchema, SettingViolation};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Settings sub-form of one pack.
///
/// `values` holds the caller's values for this pack, completed with schema
/// defaults.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettingsForm {
    pub pack_id: String,
    pub label: String,
    pub settings: IndexMap<String, SettingSchema>,
    pub values: Map<String, Value>,
}

impl SettingsForm {
    /// Build the form of `pack`, seeded with `values` over schema defaults.
    pub(crate) fn new(pack: &PackDefinition, values: Option<&Map<String, Value>>) -> Self {
        let mut seeded = pack.setting_defaults();
        if let Some(values) = values {
            for (name, value) in values {
                if pack.settings.contains_key(name) {
                    seeded.insert(name.clone(), value.clone());
                }
            }
        }
        Self {
            pack_id: pack.id.clone(),
            label: pack.label.clone(),
            settings: pack.settings.clone(),
            values: seeded,
        }
    }

    /// Validate submitted values, reporting every violation.
    ///
    /// Keys without a schema are ignored, as are settings absent from
    /// `values`.
    #[must_use]
    pub fn validate(&self, values: &Map<String, Value>) -> Vec<SettingViolation> {
        self.settings
            .iter()
            .filter_map(|(name, schema)| Some((name, schema, values.get(name)?)))
            .flat_map(|(name, schema, value)| schema.validate(name, value))
            .collect()
    }
}
