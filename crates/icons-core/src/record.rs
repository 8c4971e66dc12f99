//! Resolved icon value object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::IconRecordError;

/// Separator between pack id and icon id in a full icon id.
pub const ICON_ID_SEPARATOR: char = ':';

/// Data keys only needed while discovering; never stored on a record.
const BUILD_ONLY_KEYS: [&str; 2] = ["relative_path", "absolute_path"];

/// Join a pack id and an icon id into a full id (`pack:icon`).
#[must_use]
pub fn create_icon_id(pack_id: &str, icon_id: &str) -> String {
    format!("{pack_id}{ICON_ID_SEPARATOR}{icon_id}")
}

/// Split a full id back into `(pack_id, icon_id)`.
///
/// Returns `None` when the separator is missing.
#[must_use]
pub fn split_icon_id(full_id: &str) -> Option<(&str, &str)> {
    full_id.split_once(ICON_ID_SEPARATOR)
}

/// Turn an identifier into a display label.
///
/// Splits on non-alphanumeric runs and lower-to-upper case boundaries, then
/// capitalizes each word: `arrow_left` and `arrowLeft` both become
/// `Arrow Left`.
#[must_use]
pub fn humanize(text: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in text.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One resolved icon.
///
/// Immutable once created. Records are built by extractors during discovery
/// and shared read-only afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IconRecord {
    pack_id: String,
    icon_id: String,
    template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Map<String, Value>>,
}

/// Render input handed to the template collaborator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderDescriptor {
    /// Template reference of the owning pack.
    pub template: String,
    /// Asset library to attach, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    /// Template variables.
    pub context: Map<String, Value>,
}

impl IconRecord {
    /// Create a record, validating the required fields.
    ///
    /// Build-only keys (`relative_path`, `absolute_path`, `config.sources`)
    /// are removed from `data`. An empty `group` is stored as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`IconRecordError`] listing every empty value among
    /// `pack_id`, `icon_id` and `template`.
    pub fn create(
        pack_id: impl Into<String>,
        icon_id: impl Into<String>,
        template: impl Into<String>,
        source: Option<String>,
        group: Option<String>,
        data: Option<Map<String, Value>>,
    ) -> Result<Self, IconRecordError> {
        let pack_id = pack_id.into();
        let icon_id = icon_id.into();
        let template = template.into();

        let missing: Vec<&'static str> = [
            ("pack_id", pack_id.is_empty()),
            ("icon_id", icon_id.is_empty()),
            ("template", template.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, empty)| empty.then_some(name))
        .collect();
        if !missing.is_empty() {
            return Err(IconRecordError { missing });
        }

        Ok(Self {
            pack_id,
            icon_id,
            template,
            source,
            group: group.filter(|g| !g.is_empty()),
            data: data.map(strip_build_keys),
        })
    }

    /// Full id (`pack_id:icon_id`).
    #[must_use]
    pub fn id(&self) -> String {
        create_icon_id(&self.pack_id, &self.icon_id)
    }

    /// Id of the owning pack.
    #[must_use]
    pub fn pack_id(&self) -> &str {
        &self.pack_id
    }

    /// Id unique within the pack.
    #[must_use]
    pub fn icon_id(&self) -> &str {
        &self.icon_id
    }

    /// Human readable label derived from the icon id.
    #[must_use]
    pub fn label(&self) -> String {
        humanize(&self.icon_id)
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// All auxiliary data.
    #[must_use]
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    /// One auxiliary data value.
    #[must_use]
    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.data.as_ref()?.get(key)
    }

    /// Label of the owning pack, falling back to the pack id.
    #[must_use]
    pub fn pack_label(&self) -> &str {
        self.get_data("pack_label")
            .and_then(Value::as_str)
            .unwrap_or(&self.pack_id)
    }

    /// Build the render descriptor for this icon.
    ///
    /// `settings` overlay the pack's `settings` defaults stored in `data`.
    #[must_use]
    pub fn renderable(&self, settings: &Map<String, Value>) -> RenderDescriptor {
        let mut context = Map::new();
        context.insert("icon_id".to_owned(), Value::from(self.icon_id.as_str()));
        if let Some(source) = &self.source {
            context.insert("source".to_owned(), Value::from(source.as_str()));
        }
        for key in ["content", "attributes"] {
            if let Some(value) = self.get_data(key) {
                context.insert(key.to_owned(), value.clone());
            }
        }
        if let Some(Value::Object(defaults)) = self.get_data("settings_defaults") {
            for (key, value) in defaults {
                context.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in settings {
            context.insert(key.clone(), value.clone());
        }

        RenderDescriptor {
            template: self.template.clone(),
            library: self
                .get_data("library")
                .and_then(Value::as_str)
                .map(str::to_owned),
            context,
        }
    }
}

fn strip_build_keys(mut data: Map<String, Value>) -> Map<String, Value> {
    for key in BUILD_ONLY_KEYS {
        data.remove(key);
    }
    if let Some(Value::Object(config)) = data.get_mut("config") {
        config.remove("sources");
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Option<Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[test]
    fn test_create_and_accessors() {
        let icon = IconRecord::create(
            "solid",
            "arrow_left",
            "<img src=\"{{ source }}\">",
            Some("/icons/arrow_left.svg".to_owned()),
            Some("arrows".to_owned()),
            data(json!({"pack_label": "Solid"})),
        )
        .unwrap();

        assert_eq!(icon.id(), "solid:arrow_left");
        assert_eq!(icon.label(), "Arrow Left");
        assert_eq!(icon.source(), Some("/icons/arrow_left.svg"));
        assert_eq!(icon.group(), Some("arrows"));
        assert_eq!(icon.pack_label(), "Solid");
    }

    #[test]
    fn test_all_violations_reported_together() {
        let err = IconRecord::create("", "", "", None, None, None).unwrap_err();
        assert_eq!(err.missing, vec!["pack_id", "icon_id", "template"]);

        let err = IconRecord::create("pack", "", "", None, None, None).unwrap_err();
        assert_eq!(err.missing, vec!["icon_id", "template"]);
    }

    #[test]
    fn test_build_only_keys_stripped() {
        let icon = IconRecord::create(
            "p",
            "i",
            "t",
            None,
            None,
            data(json!({
                "relative_path": "modules/p",
                "absolute_path": "/var/www/modules/p",
                "config": {"sources": ["icons/*"], "offset": 2},
                "pack_label": "P",
            })),
        )
        .unwrap();

        let data = icon.data().unwrap();
        assert!(!data.contains_key("relative_path"));
        assert!(!data.contains_key("absolute_path"));
        assert_eq!(data["config"], json!({"offset": 2}));
        assert_eq!(data["pack_label"], json!("P"));
    }

    #[test]
    fn test_empty_group_is_none() {
        let icon = IconRecord::create("p", "i", "t", None, Some(String::new()), None).unwrap();
        assert_eq!(icon.group(), None);
    }

    #[test]
    fn test_icon_id_round_trip() {
        for (pack, icon) in [("solid", "home"), ("my_pack", "arrow-left_2"), ("a", "b")] {
            let full = create_icon_id(pack, icon);
            assert_eq!(split_icon_id(&full), Some((pack, icon)));
        }
        assert_eq!(split_icon_id("no-separator"), None);
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("arrow_left"), "Arrow Left");
        assert_eq!(humanize("arrowLeft"), "Arrow Left");
        assert_eq!(humanize("foo-bar 2"), "Foo Bar 2");
        assert_eq!(humanize("SVG"), "SVG");
        assert_eq!(humanize("icon2Go"), "Icon2 Go");
        assert_eq!(humanize("__"), "");
    }

    #[test]
    fn test_renderable_merges_settings() {
        let icon = IconRecord::create(
            "p",
            "home",
            "<svg>{{ content|raw }}</svg>",
            Some("/home.svg".to_owned()),
            None,
            data(json!({
                "content": "<path d=\"M0\"/>",
                "library": "p/icons",
                "settings_defaults": {"size": 24, "color": "black"},
            })),
        )
        .unwrap();

        let mut settings = Map::new();
        settings.insert("size".to_owned(), json!(48));
        let desc = icon.renderable(&settings);

        assert_eq!(desc.template, "<svg>{{ content|raw }}</svg>");
        assert_eq!(desc.library.as_deref(), Some("p/icons"));
        assert_eq!(desc.context["icon_id"], json!("home"));
        assert_eq!(desc.context["source"], json!("/home.svg"));
        assert_eq!(desc.context["content"], json!("<path d=\"M0\"/>"));
        assert_eq!(desc.context["size"], json!(48));
        assert_eq!(desc.context["color"], json!("black"));
    }

    #[test]
    fn test_serde_round_trip_keeps_fields() {
        let icon = IconRecord::create("p", "i", "t", Some("s".into()), Some("g".into()), None).unwrap();
        let json = serde_json::to_string(&icon).unwrap();
        let back: IconRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, icon);
    }
}
