#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that walks a scripted route through Word Meadow.

mod hud;
mod script;
mod settings;

use std::{fs, io::ErrorKind, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use word_meadow_core::{Command, Event, Language};
use word_meadow_persistence::{SaveState, SAVE_FILE_NAME};
use word_meadow_session::{apply, Session};

use crate::settings::Settings;

/// Command-line arguments accepted by the Word Meadow executable.
#[derive(Debug, Parser)]
#[command(
    name = "word-meadow",
    about = "Walks a scripted route through the Word Meadow world"
)]
struct CliArgs {
    /// Optional TOML settings file.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Save file read at startup and written on exit.
    #[arg(long, value_name = "PATH", default_value = SAVE_FILE_NAME)]
    save: PathBuf,
    /// Ignores any existing save file.
    #[arg(long)]
    fresh: bool,
    /// Skips writing the save file.
    #[arg(long)]
    no_save: bool,
    /// Walk script: wasd walk, WASD sprint, e interacts, 1/2 select a language.
    #[arg(long, default_value = "")]
    walk: String,
    /// Number of times the walk script is repeated.
    #[arg(long, default_value_t = 1)]
    repeat: u32,
    /// Language to learn, overriding the save file and settings.
    #[arg(long, value_parser = parse_language)]
    language: Option<Language>,
    /// Prints the vocabulary of the active language.
    #[arg(long)]
    vocabulary: bool,
}

fn parse_language(name: &str) -> Result<Language, String> {
    Language::from_name(name).ok_or_else(|| {
        let known: Vec<_> = Language::ALL.iter().map(|language| language.name()).collect();
        format!("unknown language `{name}`; expected one of {}", known.join(", "))
    })
}

/// Entry point for the Word Meadow command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let settings = match &args.settings {
        Some(path) => settings::load_settings(path)?,
        None => Settings::default(),
    };
    let steps = script::parse_script(&args.walk)?;

    let mut session = load_session(&args, &settings)?;
    let mut events = Vec::new();

    if let Some(language) = args.language.or(settings.language) {
        apply(&mut session, Command::SelectLanguage { language }, &mut events);
    }

    for _ in 0..args.repeat {
        for step in &steps {
            let command = script::command_for(*step, &session);
            apply(&mut session, command, &mut events);
        }
    }
    log_summary(&events);

    if !args.no_save {
        let text = SaveState::capture(&session).to_json()?;
        fs::write(&args.save, text)
            .with_context(|| format!("failed to write save file at {}", args.save.display()))?;
        tracing::info!(path = %args.save.display(), "progress saved");
    }

    print!("{}", hud::render(&session, args.vocabulary));
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_session(args: &CliArgs, settings: &Settings) -> Result<Session> {
    if args.fresh {
        return Ok(Session::new(settings.session));
    }

    let state = match fs::read_to_string(&args.save) {
        Ok(text) => SaveState::load_or_default(&text),
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %args.save.display(), "no save file, starting fresh");
            SaveState::default()
        }
        Err(error) => {
            return Err(error).with_context(|| {
                format!("failed to read save file at {}", args.save.display())
            })
        }
    };
    Ok(state.restore(settings.session))
}

fn log_summary(events: &[Event]) {
    let mut moved = 0_usize;
    let mut blocked = 0_usize;
    let mut revealed = 0_usize;
    let mut streamed = 0_usize;
    for event in events {
        match event {
            Event::ActorMoved { .. } => moved += 1,
            Event::MoveBlocked { .. } => blocked += 1,
            Event::WordRevealed { entry, .. } => {
                revealed += 1;
                tracing::info!(word = %entry.word, english = %entry.english, "word revealed");
            }
            Event::ActiveSetChanged { activated, .. } => streamed += activated.len(),
            _ => {}
        }
    }
    tracing::info!(moved, blocked, revealed, streamed, "walk finished");
}
