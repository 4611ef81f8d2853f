mod app;

use std::process::ExitCode;

fn main() -> ExitCode {
    match app::bootstrap::build_app() {
        Ok(wiring) => app::loop_runner::run(wiring),
        Err(err) => app::loop_runner::report_startup_failure(&err),
    }
}
