//! `icons check` command implementation.

use clap::Args;

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Only check these packs (repeatable).
    #[arg(short, long = "pack")]
    packs: Vec<String>,
}

impl CheckArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let (_, registry) = global.open_registry()?;

        let mut checks = registry.check()?;
        if !self.packs.is_empty() {
            checks.retain(|check| self.packs.contains(&check.pack_id));
        }
        let mut failed = 0usize;
        for check in &checks {
            match &check.result {
                Ok(0) => output.warning(&format!("{}: no icons found", check.pack_id)),
                Ok(count) => output.success(&format!("{}: {count} icons", check.pack_id)),
                Err(e) => {
                    failed += 1;
                    output.error(&format!("{}: {e}", check.pack_id));
                }
            }
        }

        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} of {} icon packs are misconfigured",
                checks.len()
            )));
        }
        output.info(&format!("{} icon packs checked", checks.len()));
        Ok(())
    }
}
