pub mod cli;
pub mod config;
pub mod publisher;
pub mod schedule;
pub mod trello;

use anyhow::{anyhow, Result};
use log::info;
use std::time::Duration;

use cli::{Cli, Commands};
use config::{Config, Credentials};
use publisher::{PublishTarget, Publisher};
use trello::TrelloClient;

pub async fn run(cli: Cli) -> Result<()> {
    let credentials = Credentials::from_env()?;
    let client = TrelloClient::new(config::api_base(), credentials.key, credentials.token);

    match cli.command {
        Commands::Publish {
            csv_path,
            board,
            list,
            label,
            year,
            delay,
        } => {
            let config = Config::load()?;
            let target = PublishTarget {
                board_name: board.or(config.board.board_name).ok_or_else(|| {
                    anyhow!("no board name configured; pass --board or set board_name in the config file")
                })?,
                list_name: list.or(config.board.list_name).ok_or_else(|| {
                    anyhow!("no list name configured; pass --list or set list_name in the config file")
                })?,
                label_id: label.or(config.board.label_id).ok_or_else(|| {
                    anyhow!("no label id configured; pass --label or set label_id in the config file")
                })?,
                year: year.unwrap_or(config.publish.year),
                delay: Duration::from_secs(delay.unwrap_or(config.publish.delay_seconds)),
            };

            let rows = schedule::load_schedule(&csv_path)?;
            info!(
                "Loaded {} schedule entries from {}",
                rows.len(),
                csv_path.display()
            );

            Publisher::new(client, target).publish(&rows).await
        }
        Commands::Boards => {
            for board in client.member_boards().await? {
                println!("{}  {}", board.id, board.name);
            }
            Ok(())
        }
        Commands::Lists { board } => {
            let found = client
                .member_boards()
                .await?
                .into_iter()
                .find(|candidate| candidate.name == board)
                .ok_or_else(|| anyhow!("no board named {:?} found for this member", board))?;
            for list in client.board_lists(&found.id).await? {
                println!("{}  {}", list.id, list.name);
            }
            Ok(())
        }
    }
}

// Re-export commonly used types
pub use publisher::due_instant;
pub use schedule::ScheduleRow;
