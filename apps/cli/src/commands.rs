//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use salonsite_core::{BuildOptions, BuildResult, ProgressReporter};
use salonsite_shared::{SiteConfig, config_dir, init_config, load_config, load_config_from};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// salonsite: build the salon chain's website from its spreadsheet.
#[derive(Parser)]
#[command(
    name = "salonsite",
    version,
    about = "Generate the salon chain's static website from its published Google Sheet.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the sheet and regenerate every page.
    Build {
        /// Config file (defaults to ./salonsite.toml, then ~/.salonsite/salonsite.toml).
        #[arg(short, long, env = "SALONSITE_CONFIG")]
        config: Option<PathBuf>,

        /// Output directory (overrides `site.output_dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Minify the generated HTML.
        #[arg(long)]
        minify: bool,

        /// Build as if today were this date (YYYY-MM-DD); affects offer expiry.
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init {
        /// Write ./salonsite.toml instead of ~/.salonsite/salonsite.toml.
        #[arg(long)]
        local: bool,
    },
    /// Show resolved configuration.
    Show {
        /// Config file to show instead of the default lookup.
        #[arg(short, long, env = "SALONSITE_CONFIG")]
        config: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "salonsite=info",
        1 => "salonsite=debug",
        _ => "salonsite=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            config,
            out,
            minify,
            today,
        } => cmd_build(config.as_deref(), out, minify, today).await,
        Command::Config { action } => match action {
            ConfigAction::Init { local } => cmd_config_init(local),
            ConfigAction::Show { config } => cmd_config_show(config.as_deref()),
        },
    }
}

/// Explicit path if given, otherwise the standard lookup.
fn resolve_config(path: Option<&Path>) -> Result<SiteConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_build(
    config_path: Option<&Path>,
    out: Option<PathBuf>,
    minify: bool,
    today: Option<NaiveDate>,
) -> Result<()> {
    let config = resolve_config(config_path)?;

    let options = BuildOptions {
        output_root: out.unwrap_or_else(|| PathBuf::from(&config.site.output_dir)),
        today: today.unwrap_or_else(|| chrono::Local::now().date_naive()),
        minify,
    };

    info!(
        sheet = %config.sheet.id,
        out = %options.output_root.display(),
        today = %options.today,
        "building site"
    );

    let reporter = CliProgress::new()?;
    let result = salonsite_core::build_site(&config, &options, &reporter)
        .await
        .wrap_err("site build failed")?;

    print_summary(&result, &options.output_root);
    Ok(())
}

fn print_summary(result: &BuildResult, output_root: &Path) {
    println!();
    println!("  Active stores:   {}", result.active_stores);
    println!("  Services:        {}", result.services);
    println!("  Active offers:   {}", result.active_offers);
    println!("  Stylists:        {}", result.stylists);
    if !result.skipped_stores.is_empty() {
        println!(
            "  Skipped (inactive): {}",
            result.skipped_stores.join(", ")
        );
    }
    println!("  Output:          {}", output_root.display());
    println!("  Time:            {:.1}s", result.elapsed.as_secs_f64());
    println!();
    println!("  Build complete: {} pages generated.", result.pages_written);
    println!();
}

fn cmd_config_init(local: bool) -> Result<()> {
    let dir = if local {
        std::env::current_dir().wrap_err("cannot determine working directory")?
    } else {
        config_dir()?
    };
    let path = init_config(&dir)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str =
        toml::to_string_pretty(&config).map_err(|e| eyre!("failed to render config: {e}"))?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .map_err(|e| eyre!("invalid progress template: {e}"))?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { spinner })
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_written(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Writing [{current}/{total}] {path}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}
