use std::process::ExitCode;

use clap::Parser;
use prodboard::{
    config::{Args, Config},
    dashboard::Dashboard,
    errors::Error,
    io,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = ?err, "dashboard load failed");
            eprintln!("{}", err.status_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let config = Config::from_args(args)?;
    let format = config.output;
    let interval = config.watch_interval();
    let mut dashboard = Dashboard::new(config)?;

    let Some(interval) = interval else {
        let frame = dashboard.reload().await?;
        return io::write_frame(&mut std::io::stdout().lock(), &frame, format);
    };

    info!(every = ?interval, "watching sheet");
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        // A failed refresh keeps the last good chart; report it and try again next tick.
        match dashboard.reload().await {
            Ok(frame) => io::write_frame(&mut std::io::stdout().lock(), &frame, format)?,
            Err(err) => {
                error!(error = ?err, "refresh failed");
                eprintln!("{}", err.status_message());
            }
        }
    }
}
