use std::io;
use std::process::ExitCode;

use common::HarnessConfig;
use common::logger::init_logger;

#[tokio::main]
async fn main() -> ExitCode {
    let config = HarnessConfig::from_env();

    if let Err(e) = init_logger(&config.log_level, config.log_file.as_deref()) {
        eprintln!("Failed to initialize logger: {e}");
    }
    log::info!("{} starting (root: {})", config.project_name, config.root.display());

    let mut out = io::stdout();
    let result = npd_validator::run(&config, &mut out).await;

    if let Err(err) = &result {
        if let Err(write_err) = npd_validator::report_failure(err, &mut out) {
            eprintln!("Error: {err} ({write_err})");
        }
    }

    ExitCode::from(npd_validator::exit_code(&result))
}
