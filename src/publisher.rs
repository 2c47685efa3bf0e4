//! Turns schedule rows into Trello cards, one row at a time.

use crate::schedule::ScheduleRow;
use crate::trello::{TrelloClient, TrelloError};
use anyhow::{anyhow, Result};
use log::info;
use std::time::Duration;

pub const REQUIRED_CHECKLIST: &str = "Required Readings";
pub const ADDITIONAL_CHECKLIST: &str = "Additional Readings";

/// Where and how cards get published. Built from the config file plus any
/// command-line overrides; the publisher itself never touches the
/// environment.
#[derive(Debug, Clone)]
pub struct PublishTarget {
    pub board_name: String,
    pub list_name: String,
    /// Label attached to every created card.
    pub label_id: String,
    /// Year used when building due dates; the schedule only carries month
    /// and day.
    pub year: i32,
    /// Pause after each card, to stay under Trello's rate limits.
    pub delay: Duration,
}

pub struct Publisher {
    client: TrelloClient,
    target: PublishTarget,
}

impl Publisher {
    pub fn new(client: TrelloClient, target: PublishTarget) -> Self {
        Self { client, target }
    }

    /// Publish every row in order. Aborts on the first failure; rows already
    /// published stay on the board, so a re-run after a failure creates
    /// duplicates for them.
    pub async fn publish(&self, rows: &[ScheduleRow]) -> Result<()> {
        for row in rows {
            self.publish_row(row).await?;
            tokio::time::sleep(self.target.delay).await;
        }
        info!("Published {} cards to {:?}", rows.len(), self.target.board_name);
        Ok(())
    }

    async fn resolve_board_id(&self) -> Result<String> {
        self.client
            .member_boards()
            .await?
            .into_iter()
            .find(|board| board.name == self.target.board_name)
            .map(|board| board.id)
            .ok_or_else(|| {
                anyhow!(
                    "no board named {:?} found for this member; run `syllaboard boards` to see available boards",
                    self.target.board_name
                )
            })
    }

    async fn resolve_list_id(&self, board_id: &str) -> Result<String> {
        self.client
            .board_lists(board_id)
            .await?
            .into_iter()
            .find(|list| list.name == self.target.list_name)
            .map(|list| list.id)
            .ok_or_else(|| {
                anyhow!(
                    "no list named {:?} on board {:?}",
                    self.target.list_name,
                    self.target.board_name
                )
            })
    }

    async fn publish_row(&self, row: &ScheduleRow) -> Result<()> {
        // Board and list are looked up fresh for every card. The workload is
        // I/O bound and paced by the inter-card delay, so the extra GETs
        // keep this loop stateless at no real cost.
        let board_id = self.resolve_board_id().await?;
        let list_id = self.resolve_list_id(&board_id).await?;

        let title = format!("{}: {}", row.lecture_label, row.topic);
        let due = due_instant(self.target.year, row.month_index, row.day);
        let card_id = self
            .client
            .create_card(&list_id, &title, &due, &self.target.label_id)
            .await?;
        info!("Created card {:?} ({})", title, card_id);

        // Both checklists are created even when their readings are empty, so
        // every card looks the same on the board.
        let required_id = self
            .client
            .create_checklist(&card_id, REQUIRED_CHECKLIST)
            .await?;
        let additional_id = self
            .client
            .create_checklist(&card_id, ADDITIONAL_CHECKLIST)
            .await?;

        self.add_readings(&required_id, &row.required_readings).await?;
        self.add_readings(&additional_id, &row.additional_readings).await?;

        Ok(())
    }

    async fn add_readings(
        &self,
        checklist_id: &str,
        readings: &[String],
    ) -> Result<(), TrelloError> {
        for reading in readings.iter().filter(|reading| !reading.is_empty()) {
            self.client.add_checklist_item(checklist_id, reading).await?;
        }
        Ok(())
    }
}

/// Due instant for a schedule entry: 10 PM UTC (5 PM EST, 6 PM EDT).
pub fn due_instant(year: i32, month: u32, day: u32) -> String {
    format!("{}-{:02}-{:02}T22:00:00.000Z", year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn due_instant_pads_single_digit_days() {
        assert_eq!(due_instant(2021, 1, 5), "2021-01-05T22:00:00.000Z");
    }

    #[test]
    fn due_instant_leaves_double_digit_days_alone() {
        assert_eq!(due_instant(2021, 1, 15), "2021-01-15T22:00:00.000Z");
    }

    #[test]
    fn due_instant_pads_months_too() {
        assert_eq!(due_instant(2022, 11, 3), "2022-11-03T22:00:00.000Z");
    }
}
