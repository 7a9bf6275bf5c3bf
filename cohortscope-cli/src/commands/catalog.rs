//! Backend catalog commands: `diseases` and `health`.

use tracing::warn;

use cohortscope::catalog::{builtin_diseases, MEASUREMENTS};
use cohortscope::gateway::CohortGateway;

use crate::error::CliError;
use crate::runner::CliRunner;

/// List diseases from the backend, falling back to the built-in list.
pub fn run_diseases(debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("diseases");
    let gateway = runner.create_gateway()?;

    let diseases = match runner.block_on(gateway.diseases()) {
        Ok(diseases) if !diseases.is_empty() => diseases,
        Ok(_) => builtin_diseases(),
        Err(e) => {
            warn!(error = %e, "Disease list unavailable, using built-in catalog");
            println!("(backend unavailable, showing built-in catalog)");
            builtin_diseases()
        }
    };

    println!("Diseases");
    println!("========");
    for disease in &diseases {
        println!("  {:<16} {}", disease.key, disease.label);
    }

    println!();
    println!("Measurements");
    println!("============");
    for measurement in &MEASUREMENTS {
        println!("  {:<16} {}", measurement.id, measurement.label);
    }

    Ok(())
}

/// Probe the backend's health endpoint.
pub fn run_health(debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("health");
    let gateway = runner.create_gateway()?;

    let status = runner.block_on(gateway.health())?;
    println!("{}: {}", gateway.base_url(), status);
    Ok(())
}
