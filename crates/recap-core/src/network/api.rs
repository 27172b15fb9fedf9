use std::future::Future;

use tracing::{debug, warn};

use crate::archive::{Board, BoardResponse, Button, TierResponse};
use crate::config::RecapConfig;
use crate::error::{CODE_INVALID_BOARD, CODE_NO_TIER, CODE_NOT_FOUND, Error, Result};
use crate::network::HttpClient;

/// Source of archive data
///
/// Implemented by [`ArchiveApi`] for the live service; tests provide
/// in-memory sources.
pub trait ArchiveSource: Sync {
    /// Fetch one board listing.
    ///
    /// Fails with [`Error::NotFound`] for an unknown nickname and with
    /// [`Error::InvalidBoard`] when the board does not exist for the button.
    fn fetch_board(
        &self,
        nickname: &str,
        button: Button,
        board: Board,
    ) -> impl Future<Output = Result<BoardResponse>> + Send;

    /// Fetch the tier summary of one button; `None` when the player has no tier.
    fn fetch_tier(
        &self,
        nickname: &str,
        button: Button,
    ) -> impl Future<Output = Result<Option<TierResponse>>> + Send;

    /// Check whether the nickname exists.
    ///
    /// Probes the 4B tier endpoint. An unknown nickname gives `false`; a
    /// missing tier and any other failure give `true`, so a flaky probe never
    /// blocks the caller (at the cost of false positives when the API fails).
    fn check_nickname_exists(&self, nickname: &str) -> impl Future<Output = bool> + Send {
        async move {
            match self.fetch_tier(nickname, Button::B4).await {
                Ok(_) => true,
                Err(Error::NotFound { .. }) => false,
                Err(e) => {
                    warn!("Nickname check failed ({}), assuming it exists", e);
                    true
                }
            }
        }
    }
}

/// Client for the V-ARCHIVE archive endpoints
#[derive(Debug, Clone)]
pub struct ArchiveApi {
    client: HttpClient,
}

impl ArchiveApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build the client from configuration
    pub fn from_config(config: &RecapConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::new(config)?))
    }
}

impl ArchiveSource for ArchiveApi {
    async fn fetch_board(
        &self,
        nickname: &str,
        button: Button,
        board: Board,
    ) -> Result<BoardResponse> {
        let button_path = button.number().to_string();
        let segments = [
            "api",
            "archive",
            nickname,
            "board",
            button_path.as_str(),
            board.short_name(),
        ];

        let response = self
            .client
            .get_json::<BoardResponse>(&segments)
            .await
            .map_err(|e| board_error(e, nickname, button, board))?;
        debug!(
            "Fetched board {} {} ({} patterns)",
            button,
            board,
            response.patterns().count()
        );
        Ok(response)
    }

    async fn fetch_tier(&self, nickname: &str, button: Button) -> Result<Option<TierResponse>> {
        let button_path = button.number().to_string();
        let segments = ["api", "archive", nickname, "tier", button_path.as_str()];

        let result = tier_result(self.client.get_json::<TierResponse>(&segments).await, nickname);
        if let Ok(None) = result {
            debug!("No tier data for {} {}", nickname, button);
        }
        result
    }
}

/// Map archive error codes of the board endpoint; 101 and 900 become typed errors
fn board_error(error: Error, nickname: &str, button: Button, board: Board) -> Error {
    match error {
        Error::Api {
            code: CODE_NOT_FOUND,
            ..
        } => Error::NotFound {
            nickname: nickname.to_string(),
        },
        Error::Api {
            code: CODE_INVALID_BOARD,
            ..
        } => Error::InvalidBoard { button, board },
        other => other,
    }
}

/// Map archive error codes of the tier endpoint; 111 means "no tier yet"
fn tier_result(result: Result<TierResponse>, nickname: &str) -> Result<Option<TierResponse>> {
    match result {
        Ok(response) => Ok(Some(response)),
        Err(Error::Api {
            code: CODE_NO_TIER,
            ..
        }) => Ok(None),
        Err(Error::Api {
            code: CODE_NOT_FOUND,
            ..
        }) => Err(Error::NotFound {
            nickname: nickname.to_string(),
        }),
        Err(e) => Err(e),
    }
}
