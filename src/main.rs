use anyhow::Result;
use clap::{Parser, Subcommand};
use strum::VariantNames;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pc_advisor::client::{ConfigForm, ConfigSession, DisplayMode, Feature, HttpTransport};
use pc_advisor::{build_app, run_server, AppConfig, AppState};

#[derive(Parser)]
#[command(name = "pc-advisor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the config service (default).
    Serve {
        /// Overrides PORT.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a running service for a build and print it.
    Generate {
        #[arg(short, long, default_value = "")]
        budget: String,

        #[arg(short, long, default_value = "")]
        usage: String,

        #[arg(long, default_value = "")]
        brand: String,

        #[arg(short, long = "feature", value_parser = parse_feature)]
        features: Vec<Feature>,

        #[arg(long, default_value = "http://localhost:5500")]
        server: String,
    },
}

fn parse_feature(value: &str) -> Result<Feature, String> {
    value
        .parse()
        .map_err(|_| format!("expected one of: {}", Feature::VARIANTS.join(", ")))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(port).await,
        Commands::Generate {
            budget,
            usage,
            brand,
            features,
            server,
        } => {
            let form = ConfigForm {
                budget,
                usage,
                brand,
                features,
            };
            generate(form, &server).await
        }
    }
}

async fn serve(port: Option<u16>) -> Result<()> {
    let config = AppConfig::from_env();
    let state = AppState::from_config(&config);

    info!(
        model = state.generator.model_name(),
        static_root = %config.static_root.display(),
        "starting pc config service"
    );
    if config.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; generation requests will fail");
    }

    let app = build_app(state, &config.static_root);
    run_server(app, port.unwrap_or(config.port)).await?;
    Ok(())
}

async fn generate(form: ConfigForm, server: &str) -> Result<()> {
    let mut session = ConfigSession::new(HttpTransport::new(server));
    session.submit(&form).await;
    print!("{}", session.view());

    if !matches!(session.state().mode, DisplayMode::Results(_)) {
        anyhow::bail!("no configuration generated");
    }
    Ok(())
}
