use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use cli::{browse, export, server};
use docshelf_core::catalog::Catalog;
use docshelf_core::config::{self, AppConfig};
use docshelf_core::search::{filter_documents, CategorySelection};
use docshelf_core::site::Site;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docshelf")]
#[command(about = "Personal documentation library", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the library over HTTP
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8080
        #[arg(long)]
        bind: Option<String>,
        /// Content root for the fs provider
        #[arg(long)]
        root: Option<String>,
    },
    /// Write the library as static HTML
    Export {
        /// Output directory
        #[arg(long)]
        out: Option<String>,
        /// Content root for the fs provider
        #[arg(long)]
        root: Option<String>,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// List catalog documents, optionally filtered
    List {
        /// Free-text query over title, description and tags
        query: Option<String>,
        /// Category name, or `all`
        #[arg(long)]
        category: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare authored category counts with the documents
    Check {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse the library in the terminal
    Browse {
        /// Content root for the fs provider
        #[arg(long)]
        root: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind, root } => {
            override_root(&mut cfg, root);
            let bind = bind.unwrap_or_else(|| cfg.server.bind.clone());
            let site = Site::bootstrap(cfg)?;
            server::serve(site, &bind).await
        }
        Commands::Export { out, root, json } => {
            override_root(&mut cfg, root);
            let out = PathBuf::from(out.unwrap_or_else(|| cfg.export.out_dir.clone()));
            let site = Site::bootstrap(cfg)?;
            let summary = export::export_site(&site, &out).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "wrote {} pages to {} ({} placeholders, {} attachments)",
                    summary.pages,
                    out.display(),
                    summary.placeholders,
                    summary.attachments
                );
            }
            if !summary.failures.is_empty() {
                bail!("{} document(s) failed to load: {}", summary.failures.len(), summary.failures.join(", "));
            }
            Ok(())
        }
        Commands::List { query, category, json } => run_list(&cfg, query, category, json),
        Commands::Check { json } => run_check(&cfg, json),
        Commands::Browse { root } => {
            override_root(&mut cfg, root);
            let site = Site::bootstrap(cfg)?;
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            browse::run(&site, input, tokio::io::stdout()).await
        }
    }
}

fn override_root(cfg: &mut AppConfig, root: Option<String>) {
    if let Some(root) = root {
        cfg.content.root = root;
    }
}

fn run_list(cfg: &AppConfig, query: Option<String>, category: Option<String>, json: bool) -> Result<()> {
    let catalog = Catalog::load(&cfg.catalog)?;
    let selection = category.map(CategorySelection::from).unwrap_or_default();
    let docs = filter_documents(catalog.documents(), query.as_deref().unwrap_or(""), &selection);
    if json {
        println!("{}", serde_json::to_string_pretty(&docs)?);
        return Ok(());
    }
    for doc in docs {
        println!("{}\t{}\t{}\t{}", doc.id, doc.date, doc.category, doc.title);
    }
    Ok(())
}

fn run_check(cfg: &AppConfig, json: bool) -> Result<()> {
    let catalog = Catalog::read(&cfg.catalog)?;
    let drift = catalog.count_drift();
    let orphans = catalog.orphans();
    if json {
        let report = serde_json::json!({
            "drift": drift,
            "orphans": orphans.iter().map(|d| &d.id).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for d in &drift {
            println!("{}: authored {} but {} document(s) listed", d.category, d.authored, d.actual);
        }
        for doc in &orphans {
            println!("{}: category {} is not listed", doc.id, doc.category);
        }
        if drift.is_empty() && orphans.is_empty() {
            println!("catalog ok: {} documents", catalog.documents().len());
        }
    }
    if !drift.is_empty() {
        bail!("{} category count(s) drift from the documents", drift.len());
    }
    Ok(())
}
