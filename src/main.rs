use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codesnip::config::{load_from_path, SnipConfig, DEFAULT_CONFIG_FILE};
use codesnip::extractor::csharp::index_source;
use codesnip::output::atomic_write;
use codesnip::{qualified_paths, render, Build};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "codesnip")]
#[command(about = "Embed source excerpts in documentation by member selector", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to codesnip.toml (defaults to ./codesnip.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Extra source root searched for directive targets (repeatable)
    #[arg(short, long = "root", global = true)]
    roots: Vec<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the snippet addressed by one directive
    Extract {
        /// Directive such as `csharp[Options.cs] =Options.Method`
        directive: String,
    },

    /// Substitute directive blocks in a Markdown file or directory
    Render {
        /// Markdown file, or directory searched for `.md` files
        path: PathBuf,

        /// Output directory (otherwise the rendered file goes to stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write nothing; fail when any output file is out of date
        #[arg(long, requires = "out")]
        check: bool,

        /// Show unified diff against the current output files
        #[arg(short, long)]
        diff: bool,
    },

    /// List every selector path addressable in a C# file
    Index {
        /// C# source file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Extract { ref directive } => cmd_extract(&cli, directive),
        Commands::Render {
            ref path,
            ref out,
            check,
            diff,
        } => cmd_render(&cli, path, out.as_deref(), check, diff),
        Commands::Index { ref file } => cmd_index(file),
    }
}

/// Load configuration and assemble a build session.
///
/// Roots from the config file come first, then `--root` flags. With neither,
/// the current directory is the only root.
fn open_build(cli: &Cli) -> Result<Build> {
    let cwd = env::current_dir()?;
    let config_path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => Some(cwd.join(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
    };

    let (config, base_dir) = match config_path {
        Some(path) => {
            let config = load_from_path(&path)?;
            let base = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.clone());
            debug!(config = %path.display(), "loaded configuration");
            (config, base)
        }
        None => (SnipConfig::default(), cwd.clone()),
    };

    let mut roots = config.source_roots(&base_dir);
    roots.extend(cli.roots.iter().cloned());
    if roots.is_empty() {
        roots.push(cwd);
    }

    Ok(Build::new(config.registry(), roots))
}

fn cmd_extract(cli: &Cli, directive: &str) -> Result<()> {
    let mut build = open_build(cli)?;
    let snippet = build.extract(directive, None)?;
    println!("{}", snippet.text);
    Ok(())
}

/// Markdown documents under `path`, sorted, each with its path relative to
/// the input root (used to place the output).
fn discover_documents(path: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    if path.is_file() {
        let name = path
            .file_name()
            .map(PathBuf::from)
            .with_context(|| format!("{} has no file name", path.display()))?;
        return Ok(vec![(path.to_path_buf(), name)]);
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("md")
        {
            let relative = entry.path().strip_prefix(path)?.to_path_buf();
            documents.push((entry.path().to_path_buf(), relative));
        }
    }
    documents.sort();

    if documents.is_empty() {
        anyhow::bail!("No .md files found under {}", path.display());
    }
    Ok(documents)
}

/// Show unified diff between the current and rendered document
fn display_diff(file: &Path, current: &str, rendered: &str) {
    println!("\n{}", format!("--- {} (current)", file.display()).dimmed());
    println!("{}", format!("+++ {} (rendered)", file.display()).dimmed());

    let diff = TextDiff::from_lines(current, rendered);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn cmd_render(
    cli: &Cli,
    path: &Path,
    out: Option<&Path>,
    check: bool,
    show_diff: bool,
) -> Result<()> {
    let mut build = open_build(cli)?;
    let documents = discover_documents(path)?;

    let mut written = 0;
    let mut unchanged = 0;
    let mut stale = 0;

    for (document, relative) in &documents {
        let markdown = fs::read_to_string(document)
            .with_context(|| format!("failed to read {}", document.display()))?;
        let rendered = render(&markdown, document, &mut build);

        let Some(out_dir) = out else {
            if show_diff {
                display_diff(document, &markdown, &rendered);
            } else {
                print!("{}", rendered);
            }
            continue;
        };

        let target = out_dir.join(relative);
        let current = fs::read_to_string(&target).unwrap_or_default();
        if current == rendered {
            unchanged += 1;
            continue;
        }

        if show_diff {
            display_diff(&target, &current, &rendered);
        }

        if check {
            eprintln!("{} {}: out of date", "✗".red(), target.display());
            stale += 1;
        } else {
            atomic_write(&target, &rendered)?;
            info!(document = %document.display(), output = %target.display(), "rendered");
            println!("{} {}", "✓".green(), target.display());
            written += 1;
        }
    }

    let report = build.into_report();
    for error in report.errors() {
        eprintln!("{} {}", "✗".red(), error);
    }

    if out.is_some() {
        println!();
        println!("{}", "Summary:".bold());
        println!("  {} written", format!("{}", written).green());
        println!("  {} unchanged", format!("{}", unchanged).yellow());
        if check {
            println!("  {} out of date", format!("{}", stale).red());
        }
        println!("  {} failed directives", format!("{}", report.len()).red());
    }

    if !report.is_empty() || stale > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_index(file: &Path) -> Result<()> {
    let source =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let (tree, _) = index_source(&source)?;

    for entry in qualified_paths(&tree) {
        let line = source[..entry.span.byte_start].matches('\n').count() + 1;
        println!(
            "{}  {}",
            entry.path,
            format!("({}, line {})", entry.kind, line).dimmed()
        );
    }

    Ok(())
}
