//! `icons clear-cache` command implementation.

use clap::Args;

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the clear-cache command.
#[derive(Args)]
pub(crate) struct ClearCacheArgs;

impl ClearCacheArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let (config, registry) = global.open_registry()?;

        if !config.cache_resolved.enabled {
            output.warning("Persistent cache is disabled");
            return Ok(());
        }
        registry.invalidate();
        output.success(&format!(
            "Cleared icon caches in {}",
            config.cache_resolved.dir.display()
        ));
        Ok(())
    }
}
