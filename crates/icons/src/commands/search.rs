//! `icons search` command implementation.

use clap::Args;
use icons_registry::IconSearch;

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Search query (at least 2 characters).
    query: String,

    /// Only search these packs (repeatable).
    #[arg(short, long = "pack")]
    packs: Vec<String>,

    /// Maximum number of results (overrides config).
    #[arg(short, long)]
    max: Option<usize>,
}

impl SearchArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let (config, registry) = global.open_registry()?;

        let max = self.max.unwrap_or(config.search.max_results);
        let allowed: Vec<&str> = self.packs.iter().map(String::as_str).collect();
        let entries = IconSearch::new(registry).autocomplete(&self.query, &allowed, max)?;

        if entries.is_empty() {
            output.warning(&format!("No icons match \"{}\"", self.query));
            return Ok(());
        }
        for entry in &entries {
            output.entry(&entry.value, &entry.label);
        }
        Ok(())
    }
}
