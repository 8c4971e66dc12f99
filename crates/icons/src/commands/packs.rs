//! `icons packs` command implementation.

use clap::Args;

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the packs command.
#[derive(Args)]
pub(crate) struct PacksArgs {
    /// Append pack descriptions to labels.
    #[arg(short, long)]
    description: bool,
}

impl PacksArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let (_, registry) = global.open_registry()?;

        let options = registry.list_pack_options(self.description)?;
        if options.is_empty() {
            output.warning("No icon packs found");
            return Ok(());
        }
        for (pack_id, label) in &options {
            output.entry(pack_id, label);
        }
        Ok(())
    }
}
