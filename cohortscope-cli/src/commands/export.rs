//! Export command - run one fetch cycle and save the box plot.

use std::path::PathBuf;

use cohortscope::export::ExportFormat;
use cohortscope::refresh::RefreshPhase;

use super::common::{describe_selection, SelectionArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the export command.
pub struct ExportArgs {
    pub format: ExportFormat,
    /// Output path (default: `boxplot.<ext>` under `[export] directory`)
    pub output: Option<PathBuf>,
    pub selection: SelectionArgs,
    pub debug: bool,
}

/// Run the export command.
pub fn run(args: ExportArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("export");

    runner.require_login()?;
    let orchestrator = runner.create_orchestrator()?;
    let selection = args.selection.resolve(runner.config());

    println!("Loading {}...", describe_selection(&selection));
    runner.block_on(orchestrator.select(selection));

    let snapshot = orchestrator.snapshot();
    if snapshot.phase == RefreshPhase::Failed {
        return Err(CliError::LoadFailed(
            snapshot.last_error.unwrap_or_default(),
        ));
    }

    let path = runner.export_snapshot(&snapshot, args.format, args.output.as_deref())?;
    println!("✓ Exported {} to {}", args.format, path.display());
    Ok(())
}
