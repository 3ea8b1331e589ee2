//! Binary entrypoint for the `docshift` CLI.

use std::process::ExitCode;

use docshift::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Exit status for fatal errors: bad plan, missing root, collisions, I/O.
const FATAL: u8 = 2;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "docshift=info".into()),
    );

    // Reports go to stdout; diagnostics stay on stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match docshift::run(std::env::args()) {
        Ok(outcome) => outcome.into(),
        Err(Error::Usage(err)) => err.exit(),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(FATAL)
        }
    }
}
