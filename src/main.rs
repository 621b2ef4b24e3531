use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glass_scribe::api::{CompletionBackend, OpenAiCompletion};
use glass_scribe::config::prompts::{find_persona, ActionKind, PERSONAS};
use glass_scribe::config::{get_config_path, load_config, load_config_from, save_config};
use glass_scribe::overlay::dispatcher::ActionDispatcher;
use glass_scribe::overlay::Viewport;
use glass_scribe::replay::{parse_script, Replay};

/// Selection-triggered text transformations.
#[derive(Parser)]
#[command(name = "glass-scribe")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform text read from stdin and print the result
    Transform {
        /// improve, professional, shorter, grammar or custom
        #[arg(short, long)]
        action: String,

        /// Persona id (overrides the configured one)
        #[arg(short, long)]
        persona: Option<String>,

        /// Instruction for the custom action
        #[arg(short, long)]
        instruction: Option<String>,
    },

    /// Run a JSON-lines overlay script against a headless page
    Replay {
        script: PathBuf,

        #[arg(long, default_value_t = 1280.0)]
        width: f64,

        #[arg(long, default_value_t = 800.0)]
        height: f64,
    },

    /// Store the API key in the config file
    SetKey { key: String },

    /// Print the config file location
    ConfigPath,

    /// List the available personas
    Personas,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Transform {
            action,
            persona,
            instruction,
        } => transform(&action, persona.as_deref(), instruction.as_deref()),
        Commands::Replay {
            script,
            width,
            height,
        } => replay(&script, Viewport { width, height }),
        Commands::SetKey { key } => {
            let path = get_config_path();
            let mut config = load_config_from(&path);
            config.api_key = key.trim().to_string();
            save_config(&config)?;
            tracing::info!(path = %path.display(), "API key saved");
            Ok(())
        }
        Commands::ConfigPath => {
            println!("{}", get_config_path().display());
            Ok(())
        }
        Commands::Personas => {
            for persona in PERSONAS.iter() {
                println!("{:<12} {}: {}", persona.id, persona.name, persona.description);
            }
            Ok(())
        }
    }
}

fn transform(action: &str, persona: Option<&str>, instruction: Option<&str>) -> Result<()> {
    let kind = ActionKind::from_id(action).ok_or_else(|| anyhow!("Unknown action: {}", action))?;
    let config = load_config();

    let persona = persona.unwrap_or(&config.persona);
    if find_persona(persona).is_none() {
        return Err(anyhow!("Unknown persona: {}", persona));
    }

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;

    let mut dispatcher = ActionDispatcher::new(persona, config.has_api_key());
    let pending = dispatcher.begin(kind, &text, instruction, 0)?;

    let backend = OpenAiCompletion::from_config(&config);
    let result = backend.complete(&pending.request)?;
    println!("{}", result);
    Ok(())
}

fn replay(script: &Path, viewport: Viewport) -> Result<()> {
    let source = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read {}", script.display()))?;
    let steps = parse_script(&source)?;

    let config = load_config();
    let backend: Arc<dyn CompletionBackend> = Arc::new(OpenAiCompletion::from_config(&config));
    let mut session = Replay::new(viewport, &config, backend);
    session.run(&steps)?;

    let state = serde_json::to_string_pretty(session.controller().surface())?;
    println!("{}", state);
    Ok(())
}
