//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use coursesmith_core::pipeline::{PipelineConfig, PipelineResult, ProgressReporter};
use coursesmith_fetch::Fetcher;
use coursesmith_llm::LlmClient;
use coursesmith_shared::{config_file_path, init_config, load_config, validate_api_key};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// coursesmith — generate teaching material from a website.
#[derive(Parser)]
#[command(
    name = "coursesmith",
    version,
    about = "Fetch a website, find its educational pages, and generate Markdown teaching material.",
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
    /// Generate teaching material from a website.
    Generate {
        /// Landing page URL to analyze.
        url: String,

        /// Name of the course or website (defaults to the URL hostname).
        #[arg(short, long)]
        course: Option<String>,

        /// Subject the material teaches (defaults to the course name).
        #[arg(short, long)]
        subject: Option<String>,

        /// Output file for the generated Markdown.
        #[arg(short, long)]
        out: Option<String>,

        /// Model to use (overrides the config file).
        #[arg(long)]
        model: Option<String>,

        /// Maximum characters of aggregated text sent to the generator.
        #[arg(long)]
        max_chars: Option<usize>,
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
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "coursesmith=info",
        1 => "coursesmith=debug",
        _ => "coursesmith=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            url,
            course,
            subject,
            out,
            model,
            max_chars,
        } => {
            cmd_generate(
                &url,
                course.as_deref(),
                subject.as_deref(),
                out.as_deref(),
                model.as_deref(),
                max_chars,
            )
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

async fn cmd_generate(
    url: &str,
    course: Option<&str>,
    subject: Option<&str>,
    out: Option<&str>,
    model: Option<&str>,
    max_chars: Option<usize>,
) -> Result<()> {
    // Validate config and credential before doing anything
    let config = load_config()?;
    let api_key = validate_api_key(&config)?;

    let parsed_url = Url::parse(url).map_err(|e| eyre!("invalid URL '{url}': {e}"))?;

    // Derive course name from hostname if not provided
    let course_name = course.map(String::from).unwrap_or_else(|| {
        parsed_url.host_str().unwrap_or("unknown").to_string()
    });
    let subject = subject.map(String::from).unwrap_or_else(|| course_name.clone());

    let output_path = PathBuf::from(out.unwrap_or(&config.defaults.output_file));
    let model = model.unwrap_or(&config.openai.model);

    let pipeline_config = PipelineConfig {
        course_name: course_name.clone(),
        subject,
        url: parsed_url,
        output_path,
        max_prompt_chars: max_chars.unwrap_or(config.defaults.max_prompt_chars),
    };

    info!(url, course = %course_name, model, "generating teaching material");

    let fetcher = Fetcher::new()?;
    let client = LlmClient::new(&config.openai.base_url, api_key, model)?;
    let reporter = CliProgress::new();

    let result = coursesmith_core::pipeline::run(&pipeline_config, &fetcher, &client, &reporter)
        .await?;
    reporter.finish();

    // Print summary
    println!();
    println!("  Teaching material generated!");
    println!("  Course:  {course_name}");
    println!("  Pages:   {}", result.pages_fetched);
    if result.links_skipped > 0 {
        println!("  Skipped: {} unreachable link(s)", result.links_skipped);
    }
    println!("  Output:  {}", result.output_path.display());
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created config file at {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let path = config_file_path()?;
    println!("# {}", path.display());
    println!("{}", toml::to_string_pretty(&config)?);
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
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_fetched(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("[{current}/{total}] {url}"));
    }

    fn done(&self, _result: &PipelineResult) {
        self.spinner.set_message("Done");
    }
}
