use std::process::ExitCode;

use clap::Parser;
use sitehost::cli::{self, App};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sitehost=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("failed to start runtime: {error}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli::run(app)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            match error.downcast_ref::<sitehost::Error>() {
                Some(service_error) => {
                    tracing::error!(error = %service_error, status = service_error.status(), "operation failed");
                    eprintln!(
                        "{}",
                        serde_json::to_string(&service_error.body())
                            .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", service_error.code()))
                    );
                }
                None => eprintln!("error: {error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
