//! `icons show` command implementation.

use clap::Args;
use serde_json::Map;

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Full icon id (`pack:icon`).
    id: String,

    /// Print the render descriptor as JSON instead of the record.
    #[arg(long)]
    render: bool,
}

impl ShowArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let (_, registry) = global.open_registry()?;

        let icon = registry
            .get_icon(&self.id)?
            .ok_or_else(|| CliError::IconNotFound(self.id.clone()))?;

        if self.render {
            let descriptor = icon.renderable(&Map::new());
            output.line(&serde_json::to_string_pretty(&descriptor)?);
            return Ok(());
        }

        output.highlight(&icon.id());
        output.entry("label ", &icon.label());
        output.entry("pack  ", icon.pack_label());
        if let Some(group) = icon.group() {
            output.entry("group ", group);
        }
        if let Some(source) = icon.source() {
            output.entry("source", source);
        }
        if let Some(data) = icon.data() {
            output.line(&serde_json::to_string_pretty(data)?);
        }
        Ok(())
    }
}
