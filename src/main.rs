use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cookbook::{load_seed, logging, normalize_name, Entry, Registry};

#[derive(Parser)]
#[command(name = "cookbook", version, about = "Recipe registry and ingredient summaries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a hand-typed recipe name
    Parse {
        /// Free text, e.g. "mince-meat!!"
        text: String,
    },

    /// Print the ingredient summary of a recipe as JSON
    Summary {
        /// Seed file with the entries to load
        #[arg(long)]
        seed: PathBuf,

        /// Recipe name (exact match)
        name: String,
    },

    /// Load a seed file and check that every recipe expands
    Check {
        /// Seed file with the entries to load
        #[arg(long)]
        seed: PathBuf,
    },
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { text } => {
            let name = normalize_name(&text)?;
            println!("{}", name);
        }
        Commands::Summary { seed, name } => {
            let registry = Registry::new();
            load_seed(&registry, &seed)?;

            let summary = registry.summarize(&name)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Check { seed } => run_check(&seed)?,
    }

    Ok(())
}

fn run_check(seed: &Path) -> Result<()> {
    let registry = Registry::new();
    let count = load_seed(&registry, seed)?;
    println!("✓ Loaded {} entries from {:?}", count, seed);

    let mut failures = 0;
    for name in registry.names() {
        if !matches!(registry.get(&name), Some(Entry::Recipe(_))) {
            continue;
        }

        match registry.summarize(&name) {
            Ok(summary) => println!(
                "  ✓ {} ({} ingredients, cook time {})",
                name,
                summary.ingredients.len(),
                summary.cook_time
            ),
            Err(err) => {
                failures += 1;
                println!("  ✗ {}: {}", name, err);
            }
        }
    }

    if failures > 0 {
        bail!("{} recipe(s) cannot be expanded", failures);
    }

    println!("✅ All recipes expand");
    Ok(())
}
