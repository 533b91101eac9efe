//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use pathfinder_core::{Extractor, GeminiGenerator, LearningPathBuilder};
use pathfinder_providers::{GitHubClient, TavilyClient, YouTubeClient};
use pathfinder_shared::{
    AppConfig, CodeHostProviderConfig, ExtractionConfig, GeneratorConfig, PathfinderError,
    ResourceBag, RoadmapDocument, SearchConfig, VideoProviderConfig, init_config, load_config,
    validate_generator_key,
};

use crate::render;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pathfinder: learning roadmaps with links worth following.
#[derive(Parser)]
#[command(
    name = "pathfinder",
    version,
    about = "Generate learning roadmaps and extract validated video, repository and article links.",
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
    /// Generate a roadmap for a topic and extract its links.
    Generate {
        /// Topic to learn, e.g. "Rust async".
        topic: String,

        /// Print the learning path as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Extract validated links from an existing roadmap.
    Extract {
        /// Roadmap JSON file, or `-` for stdin.
        input: PathBuf,

        /// Treat the input as free text instead of roadmap JSON.
        #[arg(long)]
        text: bool,

        /// Print the extracted links as JSON instead of text.
        #[arg(long)]
        json: bool,
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

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout
/// stays clean for rendered output.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pathfinder=info",
        1 => "pathfinder=debug",
        _ => "pathfinder=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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
        Command::Generate { topic, json } => cmd_generate(&topic, json).await,
        Command::Extract { input, text, json } => cmd_extract(&input, text, json).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Cancel the returned token on Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            trigger.cancel();
        }
    });
    cancel
}

/// Extractor wired to the real metadata providers.
fn build_extractor(config: &AppConfig) -> Result<Extractor> {
    let youtube = YouTubeClient::new(&VideoProviderConfig::resolve(config))?;
    if !youtube.has_api_key() {
        warn!(
            env = %config.youtube.api_key_env,
            "video API key not set, video links will use fallback previews"
        );
    }
    let github = GitHubClient::new(&CodeHostProviderConfig::resolve(config))?;

    Ok(Extractor::new(
        Arc::new(youtube),
        Arc::new(github),
        ExtractionConfig::from(config),
    ))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_generate(topic: &str, json: bool) -> Result<()> {
    // Validate API key before doing anything
    let config = load_config()?;
    validate_generator_key(&config)?;

    let search = SearchConfig::resolve(&config);
    let youtube = Arc::new(YouTubeClient::new(&VideoProviderConfig::resolve(&config))?);
    let github = Arc::new(GitHubClient::new(&CodeHostProviderConfig::resolve(&config))?);
    let tavily = Arc::new(TavilyClient::new(&search)?);
    let generator = Arc::new(GeminiGenerator::new(&GeneratorConfig::resolve(&config))?);

    let extractor = Extractor::new(
        youtube.clone(),
        github.clone(),
        ExtractionConfig::from(&config),
    );
    let builder =
        LearningPathBuilder::new(generator, youtube, github, tavily, extractor).with_limits(&search);

    let spinner = Spinner::new();
    spinner.phase(&format!("Building a learning path for \"{}\"...", topic.trim()));

    let cancel = cancel_on_ctrl_c();
    let result = builder.build(topic, &cancel).await;
    spinner.done();
    let path = result?;

    info!(
        topic = %path.topic,
        steps = path.roadmap.steps.len(),
        links = path.links.len(),
        "learning path ready"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&path)?);
    } else {
        print!("{}", render::learning_path(&path));
    }
    Ok(())
}

async fn cmd_extract(input: &Path, text: bool, json: bool) -> Result<()> {
    let config = load_config()?;
    let content = read_input(input)?;
    let extractor = build_extractor(&config)?;

    let spinner = Spinner::new();
    spinner.phase("Validating links...");

    let cancel = cancel_on_ctrl_c();
    let (doc, result) = if text {
        (None, extractor.extract_text(&content, &cancel).await)
    } else {
        let doc = parse_roadmap_input(&content)?;
        let result = extractor.extract_document(&doc, &cancel).await;
        (Some(doc), result)
    };
    spinner.done();
    let links = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
    } else {
        if let Some(doc) = &doc {
            print!("{}", render::roadmap(doc));
        }
        print!("{}", render::links(&links));
    }
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Read a file, or stdin when the path is `-`.
fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).map_err(|e| PathfinderError::io(input, e).into())
}

/// Parse roadmap JSON.
///
/// Accepts a bare document (`{ "steps": [...], "resources": {...} }`) or the
/// wrapped response shape (`{ "roadmap": { "steps": [...] }, "resources": {...} }`).
pub(crate) fn parse_roadmap_input(content: &str) -> Result<RoadmapDocument> {
    let mut value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| PathfinderError::parse(format!("roadmap is not valid JSON: {e}")))?;

    let Some(object) = value.as_object_mut() else {
        return Err(eyre!("roadmap JSON must be an object"));
    };

    let doc = match object.remove("roadmap") {
        Some(inner) => {
            let mut doc: RoadmapDocument = serde_json::from_value(inner)
                .map_err(|e| PathfinderError::parse(format!("invalid roadmap: {e}")))?;
            if let Some(bag) = object.remove("resources") {
                let bag: ResourceBag = serde_json::from_value(bag)
                    .map_err(|e| PathfinderError::parse(format!("invalid resources: {e}")))?;
                doc.resources = Some(bag);
            }
            doc
        }
        None => serde_json::from_value(value)
            .map_err(|e| PathfinderError::parse(format!("invalid roadmap: {e}")))?,
    };

    if doc.is_empty() {
        warn!("roadmap has no steps or resources");
    }
    Ok(doc)
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }

    fn phase(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn done(&self) {
        self.bar.finish_and_clear();
    }
}
