use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::RwLock;

use countdown::app_state::{AppState, load_config};
use countdown::repl::Repl;
use countdown::{commands, logging, render};

/// Startup flags
#[derive(Parser)]
#[command(version, about = "Countdown timer with spoken warnings")]
struct Args {
    /// Start a countdown of this many minutes right away
    #[arg(short, long)]
    minutes: Option<String>,

    /// Warning checkpoint in seconds remaining (repeatable)
    #[arg(short, long = "warn")]
    warn: Vec<String>,

    /// Disable all audio for this session
    #[arg(long)]
    mute: bool,

    /// Tones only, no speech
    #[arg(long)]
    no_speech: bool,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    let _log_guard = logging::init();

    let mut config = load_config();
    if args.mute {
        config.audio.enabled = false;
    }
    if args.no_speech {
        config.audio.speech_enabled = false;
    }

    let (state, signals) = AppState::start(config).await;
    let renderer = tokio::spawn(render::run(signals, Arc::clone(&state.dark_mode)));
    let state = Arc::new(RwLock::new(state));

    if args.minutes.is_some() {
        if let Err(err) = commands::start(Arc::clone(&state), args.minutes, args.warn, false).await
        {
            eprintln!("{err}");
        }
    }

    let mut repl = Repl::new();
    loop {
        let Some(line) = repl.readline().await? else {
            commands::exit(Arc::clone(&state)).await;
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, Arc::clone(&state)).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    renderer.abort();
    Ok(())
}

#[derive(Parser)]
#[command(about = "countdown commands", disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a countdown (1-60 minutes)
    Start {
        minutes: Option<String>,
        /// Warning checkpoint in seconds remaining (repeatable, 1-60)
        #[arg(short, long = "warn")]
        warn: Vec<String>,
        /// Ignore the saved default warnings
        #[arg(long)]
        no_warnings: bool,
    },
    /// Pause, or resume when paused
    Pause,
    Resume,
    /// Restart the last countdown from the top
    Reset,
    /// Stop and return to setup
    #[command(alias = "cancel")]
    Back,
    Status,
    /// Edit the default warning checkpoints
    Warnings {
        #[command(subcommand)]
        action: Option<WarningAction>,
    },
    /// Toggle dark mode
    Theme,
    /// Toggle audio
    Mute,
    #[command(alias = "quit")]
    Exit,
}

#[derive(Subcommand)]
enum WarningAction {
    /// Add a checkpoint (defaults to 30 seconds)
    Add { secs: Option<u32> },
    Remove { secs: u32 },
    Clear,
    List,
}

async fn respond(line: &str, state: Arc<RwLock<AppState>>) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "countdown".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Start {
            minutes,
            warn,
            no_warnings,
        }) => commands::start(state, minutes, warn, no_warnings).await?,
        Some(Commands::Pause) => commands::toggle_pause(state).await?,
        Some(Commands::Resume) => commands::resume(state).await?,
        Some(Commands::Reset) => commands::reset(state).await?,
        Some(Commands::Back) => commands::back(state).await?,
        Some(Commands::Status) => commands::status(state).await?,
        Some(Commands::Warnings { action }) => match action {
            Some(WarningAction::Add { secs }) => commands::add_warning(state, secs).await?,
            Some(WarningAction::Remove { secs }) => commands::remove_warning(state, secs).await?,
            Some(WarningAction::Clear) => commands::clear_warnings(state).await?,
            Some(WarningAction::List) | None => commands::list_warnings(state).await,
        },
        Some(Commands::Theme) => commands::toggle_theme(state).await?,
        Some(Commands::Mute) => commands::toggle_mute(state).await,
        Some(Commands::Exit) => {
            commands::exit(state).await;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
