use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported languages and their codes
    Languages,

    /// Translate text and synthesize the result
    Translate {
        /// Source language label (defaults to the configured session language)
        #[arg(short, long)]
        from: Option<String>,

        /// Target language label (defaults to the configured session language)
        #[arg(short, long)]
        to: Option<String>,

        /// Swap source and target before translating
        #[arg(long)]
        swap: bool,

        /// Write the synthesized audio to this file
        #[arg(long)]
        audio_out: Option<PathBuf>,

        /// Write the HTML result card to this file
        #[arg(long)]
        html_out: Option<PathBuf>,

        /// Text to translate
        text: String,
    },

    /// Start an interactive translation session
    Interactive {
        /// Initial source language label
        #[arg(short, long)]
        from: Option<String>,

        /// Initial target language label
        #[arg(short, long)]
        to: Option<String>,
    },

    /// Show which model path would be used for a language pair
    Resolve {
        /// Source language label
        #[arg(short, long)]
        from: String,

        /// Target language label
        #[arg(short, long)]
        to: String,
    },

    /// Write the default configuration to a file
    Config {
        /// Output file
        #[arg(short, long, default_value = "polytalk.toml")]
        output: PathBuf,
    },
}
