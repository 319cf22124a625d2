//! Polytalk - Translation with model routing and speech
//!
//! Command-line front end: pick languages, translate text through a direct or
//! English-pivot model path, and listen to the result.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use polytalk::cli::{Args, Commands};
use polytalk::config::Config;
use polytalk::language::LanguageRegistry;
use polytalk::render;
use polytalk::session::Session;
use polytalk::translate::ModelPath;
use polytalk::workflow::{Submission, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("polytalk.toml").exists() {
                info!("Found polytalk.toml in current directory, loading...");
                Config::from_file("polytalk.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Languages => {
            let registry = LanguageRegistry::default();
            println!("\n{:<20} {:<6}", "Language", "Code");
            println!("{}", "-".repeat(26));
            for language in registry.languages() {
                println!("{:<20} {:<6}", language.display_name(), language.code);
            }
        }
        Commands::Config { output } => {
            Config::default().save_to_file(&output)?;
            println!("Default configuration written to {}", output.display());
        }
        Commands::Resolve { from, to } => {
            let workflow = Workflow::new(&config)?;
            let source = workflow.registry().lookup(&from)?.clone();
            let target = workflow.registry().lookup(&to)?.clone();

            let path = with_spinner("Loading models...", workflow.resolver().resolve(&source.code, &target.code)).await;
            match &path {
                ModelPath::Direct { .. } => println!("Direct: {}", path.model_names().join(", ")),
                ModelPath::Pivot { .. } => println!("Pivot: {}", path.model_names().join(" ➔ ")),
                ModelPath::Unavailable { failures, .. } => {
                    println!("Translation from {} to {} not supported", source.label, target.label);
                    for failure in failures {
                        println!("  {}", failure);
                    }
                }
            }
        }
        Commands::Translate { from, to, swap, audio_out, html_out, text } => {
            let workflow = Workflow::new(&config)?;
            let mut session = Session::from_config(workflow.registry(), &config.session)?;
            if let Some(label) = from {
                session.set_source(workflow.registry(), &label)?;
            }
            if let Some(label) = to {
                session.set_target(workflow.registry(), &label)?;
            }
            if swap {
                session.swap();
            }

            let submission = with_spinner("Translating...", workflow.submit(&mut session, &text)).await;
            print_submission(&submission);

            if let (Some(path), Some(clip)) = (&audio_out, &submission.audio) {
                tokio::fs::write(path, &clip.bytes).await?;
                println!("Audio written to {}", path.display());
            }
            if let (Some(path), Some(result)) = (&html_out, &submission.result) {
                let html = render::result_card_html(result, submission.audio.as_ref(), session.dark_mode);
                tokio::fs::write(path, html).await?;
                println!("Result card written to {}", path.display());
            }
        }
        Commands::Interactive { from, to } => {
            let workflow = Workflow::new(&config)?;
            let mut session = Session::from_config(workflow.registry(), &config.session)?;
            if let Some(label) = from {
                session.set_source(workflow.registry(), &label)?;
            }
            if let Some(label) = to {
                session.set_target(workflow.registry(), &label)?;
            }
            run_interactive(&workflow, &mut session, config.history.display_limit).await?;
        }
    }

    Ok(())
}

/// Line-oriented session: plain lines are translated, ":" lines are commands
async fn run_interactive(workflow: &Workflow, session: &mut Session, history_limit: usize) -> Result<()> {
    println!("Interactive translation. Type :help for commands.");
    print_selection(session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        if let Some(command) = line.strip_prefix(':') {
            let (name, argument) = match command.split_once(' ') {
                Some((name, argument)) => (name, argument.trim()),
                None => (command, ""),
            };

            match name {
                "quit" | "q" => break,
                "help" => print_help(),
                "swap" => {
                    session.swap();
                    print_selection(session);
                }
                "from" => match session.set_source(workflow.registry(), argument) {
                    Ok(()) => print_selection(session),
                    Err(e) => println!("{}", e),
                },
                "to" => match session.set_target(workflow.registry(), argument) {
                    Ok(()) => print_selection(session),
                    Err(e) => println!("{}", e),
                },
                "history" => print!("{}", render::history_text(&session.history, history_limit)),
                "dark" => {
                    let enabled = session.toggle_dark_mode();
                    println!("Dark mode {}", if enabled { "on" } else { "off" });
                }
                other => println!("Unknown command :{} (try :help)", other),
            }
            continue;
        }

        let submission = with_spinner("Translating...", workflow.submit(session, line)).await;
        print_submission(&submission);
    }

    Ok(())
}

fn print_submission(submission: &Submission) {
    for notice in &submission.notices {
        println!("{}", render::notice_text(notice));
    }
    if let Some(result) = &submission.result {
        print!("{}", render::result_text(result, submission.audio.as_ref()));
    }
}

fn print_selection(session: &Session) {
    println!(
        "{} ⇄ {}",
        session.source().display_name(),
        session.target().display_name()
    );
}

fn print_help() {
    println!(":from <language>  set source language");
    println!(":to <language>    set target language");
    println!(":swap             exchange source and target");
    println!(":history          show recent translations");
    println!(":dark             toggle dark mode for HTML output");
    println!(":quit             leave the session");
}

/// Show a spinner while a request is in flight
async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    spinner.finish_and_clear();
    output
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = std::env::current_dir()?.join(".polytalk").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "polytalk.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console logs go to stderr; stdout carries results
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("polytalk.log").display());

    Ok(())
}
