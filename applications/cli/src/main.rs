//! MusicStream - command-line client for a MusicStream library
use clap::Parser;
use musicstream_cli::{App, Cli, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs on stderr, command output on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "musicstream=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let app = App::new(&config)?;
    let output = app.run(cli.command).await?;
    println!("{}", output);

    Ok(())
}
