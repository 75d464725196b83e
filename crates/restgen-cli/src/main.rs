//! restgen CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use restgen_core::{generate, Config, SymbolTable};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "restgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug)]
struct Input {
    /// Symbol table exported by the host compiler (YAML or JSON)
    #[arg(long)]
    symbols: Option<PathBuf>,
    /// Configuration file (YAML, JSON or TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Treat the consuming project as having nullable reference types enabled
    #[arg(long)]
    nullable: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum DumpFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate client implementations for every annotated partial class
    Generate {
        #[command(flatten)]
        input: Input,
        /// Output directory for generated sources
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Print the generated sources instead of writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the client models built from a symbol table
    Inspect {
        #[command(flatten)]
        input: Input,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: DumpFormat,
    },
}

/// Merges a configuration file with command-line overrides.
async fn load_config(input: &Input, output_dir: Option<&PathBuf>) -> anyhow::Result<Config> {
    let mut config = match &input.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::new("", "Generated"),
    };
    if let Some(symbols) = &input.symbols {
        config.symbols_path = symbols.to_string_lossy().to_string();
    }
    if let Some(output_dir) = output_dir {
        config.output_dir = output_dir.to_string_lossy().to_string();
    }
    if input.nullable {
        config.options.nullable_enabled = true;
    }
    if config.symbols_path.is_empty() {
        anyhow::bail!("No symbol table given; pass --symbols or set symbols_path in --config");
    }
    Ok(config)
}

async fn load_table(config: &Config) -> anyhow::Result<SymbolTable> {
    SymbolTable::from_file(&config.symbols_path)
        .await
        .with_context(|| format!("Failed to load symbol table from {}", config.symbols_path))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match &cli.command {
        Commands::Generate {
            input,
            output_dir,
            dry_run,
        } => {
            let config = load_config(input, output_dir.as_ref()).await?;
            tracing::info!(
                symbols = %config.symbols_path,
                output = %config.output_dir,
                "generating"
            );

            if *dry_run {
                let table = load_table(&config).await?;
                let sources = restgen_core::generate_sources(&table, &config.options)?;
                for source in &sources {
                    println!("// ---- {} ----", source.hint_name);
                    println!("{}", source.text);
                }
                return Ok(());
            }

            let written = generate(&config)
                .await
                .context("Failed to generate client sources")?;
            for path in &written {
                println!("{}", path.display());
            }
            println!("✅ Generated {} file(s) in {}", written.len(), config.output_dir);
        }
        Commands::Inspect { input, format } => {
            let config = load_config(input, None).await?;
            let table = load_table(&config).await?;
            let classes = restgen_core::generate::discover(&table, &config.options);
            tracing::debug!(count = classes.len(), "discovered clients");
            let text = match format {
                DumpFormat::Json => serde_json::to_string_pretty(&classes)?,
                DumpFormat::Yaml => serde_yaml::to_string(&classes)?,
            };
            println!("{text}");
        }
    }

    Ok(())
}
