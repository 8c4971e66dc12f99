//! `icons list` command implementation.

use clap::Args;

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Only list icons of these packs (repeatable).
    #[arg(short, long = "pack")]
    packs: Vec<String>,
}

impl ListArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let (_, registry) = global.open_registry()?;

        let allowed: Vec<&str> = self.packs.iter().map(String::as_str).collect();
        let icons = registry.get_icons(&allowed)?;
        for (id, icon) in icons.iter() {
            output.entry(id, icon.source().unwrap_or_default());
        }
        output.info(&format!("{} icons", icons.len()));
        Ok(())
    }
}
