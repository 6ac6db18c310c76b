use anyhow::Result;
use clap::{ArgAction, Parser};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};
use theme_patcher::recipe::{self, Recipe};
use theme_patcher::{expand_targets, Patcher, WriteMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "theme-patcher")]
#[command(about = "Add useTheme to MUI component files", long_about = None)]
#[command(version)]
struct Cli {
    /// Files to patch; directories are searched for source files
    paths: Vec<PathBuf>,

    /// Recipe TOML to use instead of the built-in one
    #[arg(short, long)]
    recipe: Option<PathBuf>,

    /// Write through a tempfile + rename instead of overwriting in place
    #[arg(long)]
    atomic: bool,

    /// Show unified diff of changes
    #[arg(short, long)]
    diff: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let recipe = resolve_recipe(cli.recipe)?;
    let write_mode = if cli.atomic {
        WriteMode::Atomic
    } else {
        WriteMode::Overwrite
    };
    let patcher = Patcher::from_recipe(&recipe)?.with_write_mode(write_mode);
    let targets = expand_targets(&cli.paths, &recipe.meta.extensions)?;

    // First failure aborts the run; files already handled stay patched
    for target in targets {
        let outcome = patcher.patch_file(&target)?;
        println!("Added {} to: {}", patcher.marker(), target.display());

        if cli.diff && outcome.changed() {
            display_diff(&outcome.file, &outcome.original, &outcome.patched);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout only carries the confirmation lines.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// The `--recipe` file when given, otherwise the built-in recipe.
fn resolve_recipe(cli_recipe: Option<PathBuf>) -> Result<Recipe> {
    match cli_recipe {
        Some(path) => Ok(recipe::load_from_path(&path)?),
        None => Ok(recipe::builtin()?),
    }
}

/// Show unified diff between original and patched content
fn display_diff(file: &Path, original: &str, patched: &str) {
    println!(
        "{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, patched);

    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => continue,
        };
        print!("{}", line);
    }
}
