use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use manifold_core::{filter, Manifest};
use manifold_source::{manifest_from, Path, Reader, Recursive};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "manifoldctl", version, about = "Order Kubernetes manifests for creation")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    /// Keep only resources in this namespace
    #[arg(long = "ns", global = true)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Human, Json }

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode manifests and print them in creation order
    Sort {
        /// Files or directories; stdin when empty or "-"
        paths: Vec<PathBuf>,
        /// Descend into subdirectories
        #[arg(short = 'R', long = "recursive", action = ArgAction::SetTrue)]
        recursive: bool,
        /// Keep only these kinds (repeatable)
        #[arg(long = "kind")]
        kinds: Vec<String>,
    },
    /// Print the kind-priority table
    Kinds,
}

#[derive(Debug, Serialize)]
struct KindRow {
    kind: &'static str,
    rank: u32,
}

fn init_tracing() {
    let env = std::env::var("MANIFOLD_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // stdout carries manifests; logs go to stderr
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}

fn load(paths: &[PathBuf], recursive: bool) -> Result<Manifest> {
    if paths.is_empty() {
        return manifest_from(Reader(std::io::stdin().lock())).context("reading manifests from stdin");
    }
    let mut manifest = Manifest::default();
    for p in paths {
        let loaded = if p.as_os_str() == "-" {
            manifest_from(Reader(std::io::stdin().lock())).context("reading manifests from stdin")?
        } else if recursive {
            manifest_from(Recursive(p.clone())).with_context(|| format!("loading {}", p.display()))?
        } else {
            manifest_from(Path(p.clone())).with_context(|| format!("loading {}", p.display()))?
        };
        manifest = manifest.append(&loaded);
    }
    Ok(manifest)
}

fn select(manifest: &Manifest, namespace: Option<&str>, kinds: &[String]) -> Manifest {
    let mut preds = Vec::new();
    if let Some(ns) = namespace {
        preds.push(filter::by_namespace(ns));
    }
    if !kinds.is_empty() {
        preds.push(filter::any(kinds.iter().map(|k| filter::by_kind(k.as_str())).collect()));
    }
    manifest.filter(filter::all(preds))
}

/// Multi-document YAML stream, one document per resource.
fn render_yaml(manifest: &Manifest) -> Result<String> {
    let mut docs = Vec::with_capacity(manifest.len());
    for r in manifest {
        docs.push(serde_yaml::to_string(r).with_context(|| format!("rendering {}", r))?);
    }
    Ok(docs.join("---\n"))
}

fn render_kinds(output: Output) -> Result<String> {
    let rows: Vec<KindRow> = manifold_sort::known_kinds()
        .into_iter()
        .map(|(kind, rank)| KindRow { kind, rank })
        .collect();
    match output {
        Output::Human => {
            let mut out = String::from("RANK  KIND\n");
            for row in &rows {
                out.push_str(&format!("{:<5} {}\n", row.rank, row.kind));
            }
            out.push_str(&format!("{:<5} <any other kind>\n", manifold_sort::UNKNOWN_PRIORITY));
            Ok(out)
        }
        Output::Json => Ok(serde_json::to_string_pretty(&rows)? + "\n"),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let rendered = match cli.command {
        Commands::Sort { paths, recursive, kinds } => {
            info!(paths = paths.len(), recursive, "sort invoked");
            let manifest = load(&paths, recursive)?;
            let selected = select(&manifest, cli.namespace.as_deref(), &kinds);
            let sorted = manifold_sort::sort_by_kind(&selected);
            info!(loaded = manifest.len(), emitted = sorted.len(), "manifest ordered");
            match cli.output {
                Output::Human => render_yaml(&sorted)?,
                Output::Json => serde_json::to_string_pretty(&sorted)? + "\n",
            }
        }
        Commands::Kinds => render_kinds(cli.output)?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes()).context("writing output")?;
    stdout.flush().context("writing output")?;
    Ok(())
}
