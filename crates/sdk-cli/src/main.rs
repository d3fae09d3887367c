use clap::Parser;
use colored::Colorize;
use sdk_cli::commands::{self, Context};
use sdk_cli::config::SdkHome;
use sdk_cli::{Cli, Commands, RepoCommands};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let home = SdkHome::locate(cli.home.clone());
    init_logging(&home);

    if let Err(e) = run(cli, home).await {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

/// Log to `<home>/sdk.log` so progress bars stay clean; fall back to
/// stderr when the home directory is not writable.
fn init_logging(home: &SdkHome) {
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_file = std::fs::create_dir_all(home.root()).ok().and_then(|()| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(home.log_path())
            .ok()
    });

    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(cli: Cli, home: SdkHome) -> anyhow::Result<()> {
    let mut ctx = Context::new(home)?;

    match cli.command {
        Commands::Resolve { kind, reference } => {
            commands::resolve(&ctx, &kind, &reference).await
        }
        Commands::Push { coordinates, repo } => {
            commands::push(&ctx, &coordinates, repo.as_deref()).await
        }
        Commands::Install {
            kind,
            reference,
            repo,
        } => commands::install(&ctx, &kind, &reference, repo.as_deref()).await,
        Commands::Remove {
            coordinates,
            remote,
        } => commands::remove(&ctx, &coordinates, remote).await,
        Commands::List { set } => commands::list(&ctx, &set),
        Commands::Versions {
            coordinates,
            stable_only,
        } => commands::versions(&ctx, &coordinates, stable_only).await,
        Commands::Repo { command } => match command {
            RepoCommands::List => commands::repo_list(&ctx),
            RepoCommands::Add {
                name,
                url,
                kind,
                targets,
                username,
                password,
                repository,
            } => commands::repo_add(
                &mut ctx,
                &name,
                &url,
                &kind,
                &targets,
                username.as_deref(),
                password.as_deref(),
                repository.as_deref(),
            ),
            RepoCommands::Remove { name } => commands::repo_remove(&mut ctx, &name),
        },
        Commands::Clean => commands::clean(&ctx),
    }
}
