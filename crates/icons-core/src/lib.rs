//! Icon records, pack definitions and the extractors that connect them.
//!
//! A pack definition names one extractor and its configuration. Running the
//! extractor with an [`IconFinder`](icons_finder::IconFinder) yields an
//! [`IconMap`] of immutable [`IconRecord`]s keyed by full id (`pack:icon`).

pub mod definition;
mod error;
pub mod extractor;
mod record;
pub mod settings;

pub use definition::{License, PackDefinition, PathContext, parse_pack_definitions};
pub use error::{ConfigurationError, IconRecordError};
pub use extractor::{
    ExtractorKind, Extractors, HttpIconifyClient, IconMap, IconifyClient, PackExtractor,
};
pub use record::{
    ICON_ID_SEPARATOR, IconRecord, RenderDescriptor, create_icon_id, humanize, split_icon_id,
};
pub use settings::{SettingSchema, SettingType, SettingViolation};
