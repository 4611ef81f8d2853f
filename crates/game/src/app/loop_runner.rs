use std::process::ExitCode;

use engine::run_app;
use tracing::{error, info};

use super::bootstrap::{AppWiring, BootstrapError};

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        scene,
        mut input,
    } = app;

    match run_app(config, scene, &mut input) {
        Ok(summary) => {
            info!(
                ticks = summary.ticks_run,
                reason = ?summary.exit_reason,
                unused_script_events = input.remaining_events(),
                "run_complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}

pub(crate) fn report_startup_failure(err: &BootstrapError) -> ExitCode {
    error!(error = %err, "startup_failed");
    ExitCode::FAILURE
}
