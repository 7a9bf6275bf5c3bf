//! Dashboard command - interactive terminal dashboard.
//!
//! Selection changes are fired as background cycles; the screen always shows
//! the orchestrator's latest snapshot, so a quick succession of `m` presses
//! only ever commits the last one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use cohortscope::catalog::next_measurement;

use super::common::{format_report, SelectionArgs};
use crate::error::CliError;
use crate::runner::{CliOrchestrator, CliRunner};
use crate::ui::{Dashboard, DashboardEvent, DashboardState};

/// Arguments for the dashboard command.
#[derive(Default)]
pub struct DashboardArgs {
    pub selection: SelectionArgs,
    pub debug: bool,
}

/// Run the dashboard command.
pub fn run(args: DashboardArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("dashboard");

    let user = runner.require_login()?;
    let orchestrator = Arc::new(runner.create_orchestrator()?);
    let selection = args.selection.resolve(runner.config());

    if !atty::is(atty::Stream::Stdout) {
        // No terminal to draw on: one cycle, plain report.
        runner.block_on(orchestrator.select(selection));
        print!("{}", format_report(&orchestrator.snapshot(), &user));
        return Ok(());
    }

    let _runtime = runner.enter();

    // Set up signal handler for graceful shutdown
    let shutdown = Arc::new(AtomicBool::new(false));
    let signal_cancellation = CancellationToken::new();
    {
        let shutdown = Arc::clone(&shutdown);
        let cancelled = signal_cancellation.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                result = tokio::signal::ctrl_c() => {
                    if result.is_ok() {
                        info!("Interrupt received, shutting down dashboard");
                        shutdown.store(true, Ordering::SeqCst);
                    }
                }
            }
        });
    }

    let mut dashboard = Dashboard::new(DashboardState::new(user), Arc::clone(&shutdown))
        .map_err(CliError::Terminal)?;

    orchestrator.spawn_select(selection);
    let result = event_loop(&runner, &orchestrator, &mut dashboard);

    signal_cancellation.cancel();
    dashboard.restore().map_err(CliError::Terminal)?;
    result
}

fn event_loop(
    runner: &CliRunner,
    orchestrator: &Arc<CliOrchestrator>,
    dashboard: &mut Dashboard,
) -> Result<(), CliError> {
    let mut updates = orchestrator.subscribe();

    loop {
        let snapshot = updates.borrow_and_update().clone();
        dashboard.draw(&snapshot).map_err(CliError::Terminal)?;

        let Some(event) = dashboard.poll_event().map_err(CliError::Terminal)? else {
            continue;
        };

        match event {
            DashboardEvent::Quit => break,
            DashboardEvent::NextMeasurement => {
                if let Some(current) = &snapshot.selection {
                    let next = current.with_measurement(next_measurement(current.measurement_id));
                    orchestrator.spawn_select(next);
                }
            }
            DashboardEvent::Refresh => {
                orchestrator.spawn_refresh();
            }
            DashboardEvent::Export(format) => {
                match runner.export_snapshot(&snapshot, format, None) {
                    Ok(path) => dashboard
                        .state_mut()
                        .notify(format!("Exported {}", path.display())),
                    Err(e) => {
                        warn!(error = %e, "Export failed");
                        dashboard.state_mut().notify_error(e.to_string());
                    }
                }
            }
        }
    }

    Ok(())
}
