mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gantry", about = "Build minimal container images for ASGI services")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new ASGI project
    New {
        /// Project name
        name: String,
    },
    /// Add gantry to an existing ASGI project
    Init,
    /// Print the Dockerfile the pipeline would build
    Render,
    /// Build the runtime image
    Build {
        /// Image tag (default: <project-dir>:latest)
        #[arg(long)]
        tag: Option<String>,
        /// Allow building with uncommitted changes
        #[arg(long)]
        allow_dirty: bool,
    },
    /// Start a container from the built image
    Run {
        /// Image tag (default: <project-dir>:latest)
        #[arg(long)]
        tag: Option<String>,
    },
    /// Eject the Dockerfile for manual customization
    Eject,
    /// Check engine and project readiness
    Doctor,
    /// Remove the build context, and optionally the built image
    Clean {
        /// Also remove the built image
        #[arg(long)]
        image: bool,
        /// Image tag (default: <project-dir>:latest)
        #[arg(long)]
        tag: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::New { name } => commands::new_project(&name).await?,
        Commands::Init => commands::init_project().await?,
        Commands::Render => commands::render().await?,
        Commands::Build { tag, allow_dirty } => commands::build(tag, allow_dirty).await?,
        Commands::Run { tag } => commands::run(tag).await?,
        Commands::Eject => commands::eject().await?,
        Commands::Doctor => commands::doctor().await?,
        Commands::Clean { image, tag } => commands::clean(image, tag).await?,
    }

    Ok(())
}
