//! `parkbridged` binary: listens for the simulator and applies parking
//! events until a termination signal arrives.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use parkbridged::host::shutdown;
use parkbridged::{StructuredHealthReporter, SystemConfigLoader, bootstrap_with};

fn main() -> ExitCode {
    let reporter = Arc::new(StructuredHealthReporter::new());
    let daemon = match bootstrap_with(&SystemConfigLoader, reporter) {
        Ok(daemon) => daemon,
        Err(error) => {
            // Configuration errors arrive before the subscriber is installed.
            writeln!(io::stderr(), "parkbridged: {error}").ok();
            return ExitCode::FAILURE;
        }
    };

    let flag = match shutdown::install() {
        Ok(flag) => flag,
        Err(error) => {
            tracing::error!(error = %error, "failed to install signal handlers");
            return ExitCode::FAILURE;
        }
    };

    let mut host = daemon.into_host();
    host.run(&flag);
    ExitCode::SUCCESS
}
