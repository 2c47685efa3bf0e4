//! Thin wrappers over the Trello REST API.
//!
//! Every call authenticates with the key + token pair as query parameters;
//! Trello's API-key auth works that way, so nothing goes in headers or
//! request bodies. Errors from create calls carry the full request and
//! response context so a failed run is diagnosable from the log alone.

use log::{debug, error};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com";

#[derive(Debug, Error)]
pub enum TrelloError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned an unexpected response shape (status {status}): {body}")]
    UnexpectedShape {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    #[error(
        "{endpoint} response has no id field.\nRequest was: {query:?}\nResponse was: {body}\nCode: {status}\nReason: {reason}"
    )]
    MissingId {
        endpoint: String,
        /// The query parameters as sent, with credentials redacted.
        query: Vec<(String, String)>,
        body: String,
        status: StatusCode,
        reason: String,
    },
}

/// An `{id, name}` pair as returned by the board and list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

pub struct TrelloClient {
    http: Client,
    base_url: String,
    key: String,
    token: String,
}

impl TrelloClient {
    pub fn new(
        base_url: impl Into<String>,
        key: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            key: key.into(),
            token: token.into(),
        }
    }

    /// All boards visible to the authenticated member.
    pub async fn member_boards(&self) -> Result<Vec<NamedRef>, TrelloError> {
        let endpoint = format!("{}/1/members/me/boards", self.base_url);
        self.get_named_refs(endpoint).await
    }

    /// The lists on one board.
    pub async fn board_lists(&self, board_id: &str) -> Result<Vec<NamedRef>, TrelloError> {
        let endpoint = format!("{}/1/boards/{}/lists", self.base_url, board_id);
        self.get_named_refs(endpoint).await
    }

    /// Create a card and return its id.
    pub async fn create_card(
        &self,
        list_id: &str,
        name: &str,
        due: &str,
        label_id: &str,
    ) -> Result<String, TrelloError> {
        let endpoint = format!("{}/1/cards/", self.base_url);
        let query = vec![
            ("key", self.key.clone()),
            ("token", self.token.clone()),
            ("idList", list_id.to_string()),
            ("pos", "bottom".to_string()),
            ("name", name.to_string()),
            ("due", due.to_string()),
            ("idLabels", label_id.to_string()),
        ];
        self.post_expecting_id(endpoint, query).await
    }

    /// Create a checklist on a card and return its id.
    pub async fn create_checklist(
        &self,
        card_id: &str,
        name: &str,
    ) -> Result<String, TrelloError> {
        let endpoint = format!("{}/1/checklists", self.base_url);
        let query = vec![
            ("key", self.key.clone()),
            ("token", self.token.clone()),
            ("idCard", card_id.to_string()),
            ("name", name.to_string()),
            ("pos", "bottom".to_string()),
        ];
        self.post_expecting_id(endpoint, query).await
    }

    /// Add one item to a checklist. Trello's response is not inspected.
    pub async fn add_checklist_item(
        &self,
        checklist_id: &str,
        name: &str,
    ) -> Result<(), TrelloError> {
        let endpoint = format!("{}/1/checklists/{}/checkItems", self.base_url, checklist_id);
        debug!("POST {} name={:?}", endpoint, name);
        let query = [
            ("key", self.key.as_str()),
            ("token", self.token.as_str()),
            ("id", checklist_id),
            ("name", name),
            ("pos", "bottom"),
        ];
        self.http
            .post(endpoint.as_str())
            .header(ACCEPT, "application/json")
            .query(&query)
            .send()
            .await
            .map_err(|source| TrelloError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        Ok(())
    }

    async fn get_named_refs(&self, endpoint: String) -> Result<Vec<NamedRef>, TrelloError> {
        debug!("GET {}", endpoint);
        let response = self
            .http
            .get(endpoint.as_str())
            .header(ACCEPT, "application/json")
            .query(&[("key", self.key.as_str()), ("token", self.token.as_str())])
            .send()
            .await
            .map_err(|source| TrelloError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| TrelloError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        match serde_json::from_str(&body) {
            Ok(refs) => Ok(refs),
            Err(_) => {
                let err = TrelloError::UnexpectedShape {
                    endpoint,
                    status,
                    body,
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    async fn post_expecting_id(
        &self,
        endpoint: String,
        query: Vec<(&'static str, String)>,
    ) -> Result<String, TrelloError> {
        debug!("POST {}", endpoint);
        let response = self
            .http
            .post(endpoint.as_str())
            .header(ACCEPT, "application/json")
            .query(&query)
            .send()
            .await
            .map_err(|source| TrelloError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("unknown").to_string();
        let body = response
            .text()
            .await
            .map_err(|source| TrelloError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        match parsed.get("id").and_then(Value::as_str) {
            Some(id) => Ok(id.to_string()),
            None => {
                let err = TrelloError::MissingId {
                    endpoint,
                    query: redact_credentials(query),
                    body,
                    status,
                    reason,
                };
                error!("{}", err);
                Err(err)
            }
        }
    }
}

fn redact_credentials(query: Vec<(&'static str, String)>) -> Vec<(String, String)> {
    query
        .into_iter()
        .map(|(name, value)| {
            if name == "key" || name == "token" {
                (name.to_string(), "<redacted>".to_string())
            } else {
                (name.to_string(), value)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_hides_credentials_only() {
        let query = vec![
            ("key", "secret-key".to_string()),
            ("token", "secret-token".to_string()),
            ("name", "Lecture 1".to_string()),
        ];
        let redacted = redact_credentials(query);
        assert_eq!(redacted[0].1, "<redacted>");
        assert_eq!(redacted[1].1, "<redacted>");
        assert_eq!(redacted[2].1, "Lecture 1");
    }
}
