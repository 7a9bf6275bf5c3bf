//! Build command - run one fetch cycle and print the comparison report.

use cohortscope::refresh::RefreshPhase;

use super::common::{describe_selection, format_report, SelectionArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the build command.
#[derive(Default)]
pub struct BuildArgs {
    pub selection: SelectionArgs,
    pub debug: bool,
}

/// Run the build command.
pub fn run(args: BuildArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("build");

    let user = runner.require_login()?;
    let orchestrator = runner.create_orchestrator()?;
    let selection = args.selection.resolve(runner.config());

    println!("Loading {}...", describe_selection(&selection));
    runner.block_on(orchestrator.select(selection));

    let snapshot = orchestrator.snapshot();
    print!("{}", format_report(&snapshot, &user));

    if snapshot.phase == RefreshPhase::Failed {
        return Err(CliError::LoadFailed(
            snapshot.last_error.unwrap_or_default(),
        ));
    }
    Ok(())
}
