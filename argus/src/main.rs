// argus/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use miette::Report;

use argus_core::ArgusError;
use cli::{Cli, Commands};
use commands::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug argus ... for the details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        // Engine errors carry diagnostic codes and help text; render
        // them with miette so the operator sees both.
        match e.downcast::<ArgusError>() {
            Ok(ArgusError::Domain(domain)) => eprintln!("{:?}", Report::new(domain)),
            Ok(ArgusError::Infrastructure(infra)) => eprintln!("{:?}", Report::new(infra)),
            Ok(other) => eprintln!("💥 {other}"),
            Err(e) => {
                eprintln!("💥 {e}");
                for cause in e.chain().skip(1) {
                    eprintln!("   ↳ {cause}");
                }
            }
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        // Query needs no context: it targets a database file directly.
        Commands::Query { query, db_path } => commands::query::execute(query, db_path),
        command => {
            let ctx = AppContext::load(&cli.config_dir).await?;
            match command {
                Commands::Project { family } => commands::project::execute(&ctx, family).await,
                Commands::Relate { statements } => {
                    commands::relate::execute(&ctx, statements).await
                }
                Commands::Correlate { json } => commands::correlate::execute(&ctx, json).await,
                Commands::ScanDb { credential } => {
                    commands::scan_db::execute(&ctx, credential).await
                }
                Commands::ScanBlob { root } => commands::scan_blob::execute(&ctx, root).await,
                Commands::KevSync { feed } => commands::kev_sync::execute(&ctx, feed).await,
                Commands::Summary => commands::summary::execute(&ctx).await,
                Commands::Query { .. } => unreachable!("handled above"),
            }
        }
    }
}
