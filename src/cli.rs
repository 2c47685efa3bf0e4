use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Syllaboard - publish a course schedule CSV to a Trello board
#[derive(Debug, Parser)]
#[command(name = "syllaboard")]
#[command(about = "Publish a course schedule CSV to a Trello board as cards with reading checklists", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Publish every schedule row as a card with reading checklists
    Publish {
        /// Path to the schedule CSV file
        csv_path: PathBuf,

        /// Board to publish to (overrides the config file)
        #[arg(long)]
        board: Option<String>,

        /// List on the board to add cards to (overrides the config file)
        #[arg(long)]
        list: Option<String>,

        /// Label id to attach to every card (overrides the config file)
        #[arg(long)]
        label: Option<String>,

        /// Year used for card due dates (overrides the config file)
        #[arg(long)]
        year: Option<i32>,

        /// Seconds to pause between cards (overrides the config file)
        #[arg(long)]
        delay: Option<u64>,
    },

    /// List your boards with their ids
    Boards,

    /// List the lists on a board
    Lists {
        /// Board name, as shown by `syllaboard boards`
        board: String,
    },
}
