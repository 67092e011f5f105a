use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Import bilingual (English/Arabic) requirement sheets and browse them"
)]
pub struct Cli {
    /// Snapshot file to use instead of the configured one (.json or .yaml)
    #[clap(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Skip the AI service and keep sheet values as they are
    #[clap(long, global = true)]
    pub offline: bool,

    /// More log output (-v info, -vv debug)
    #[clap(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a CSV or Excel sheet
    Import {
        /// Path to the .csv, .xlsx or .xls file
        file: PathBuf,
    },

    /// List requirements
    List {
        /// Only show requirements containing this text
        #[clap(long, short = 's')]
        search: Option<String>,

        /// Language to show: en, ar or both
        #[clap(long, short = 'l', default_value = "both")]
        lang: String,

        /// Only show this classification
        #[clap(long = "class", short = 'c')]
        classification: Option<String>,

        /// Show full cards instead of one line per requirement
        #[clap(long, short = 'e')]
        expand: bool,
    },

    /// Show one requirement in full
    Show {
        /// UUID or unique leading part of one (prompts if omitted)
        id: Option<String>,

        /// Language to show: en, ar or both
        #[clap(long, short = 'l', default_value = "both")]
        lang: String,
    },

    /// Delete a requirement
    Del {
        /// UUID or unique leading part of one (prompts if omitted)
        id: Option<String>,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Delete every requirement and the saved snapshot
    Purge {
        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Move a requirement to another position (positions start at 1)
    #[clap(allow_negative_numbers = true)]
    Move {
        /// Current position
        from: isize,

        /// New position
        to: isize,
    },

    /// List the classifications in use
    Classes,

    /// Table of every requirement with its extra sheet columns
    Inventory {
        /// Language of the title column: en, ar or both
        #[clap(long, short = 'l', default_value = "en")]
        lang: String,
    },

    /// Settings management
    #[clap(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective settings
    Show,

    /// Print the path to the settings file
    Path,

    /// Write a default settings file if none exists
    Init,
}
