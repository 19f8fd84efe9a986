//! Blocking HTTP client for the move protocol

use csq_core::wire::{BotParamsResponse, HealthResponse, MoveRequest, MoveResponse, ParamDescriptor};
use csq_core::Move;
use std::time::Duration;
use thiserror::Error;

/// Where the move server lives and how long to wait for it
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl RemoteConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Delegation failure; the caller decides how to recover
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("no answer within {0:?}")]
    Timeout(Duration),

    #[error("server answered HTTP {code}")]
    Status { code: u16 },
}

/// Client for one move server
#[derive(Clone, Debug)]
pub struct RemoteClient {
    config: RemoteConfig,
    http: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RemoteError::Transport)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn classify(&self, e: reqwest::Error) -> RemoteError {
        if e.is_timeout() {
            RemoteError::Timeout(self.config.timeout)
        } else {
            RemoteError::Transport(e)
        }
    }

    /// Ask for a move; a malformed or empty body counts as "no move"
    pub fn request_move(&self, req: &MoveRequest) -> Result<Option<Move>, RemoteError> {
        let response = self
            .http
            .post(self.url("/move"))
            .json(req)
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                code: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| self.classify(e))?;
        match serde_json::from_str::<Option<MoveResponse>>(&body) {
            Ok(answer) => Ok(answer.map(Move::from)),
            Err(e) => {
                tracing::warn!(url = %self.config.base_url, error = %e, "unreadable move response");
                Ok(None)
            }
        }
    }

    /// Server reachable and reporting ok; any failure reads as not ok
    pub fn health(&self) -> bool {
        let response = match self.http.get(self.url("/health")).send() {
            Ok(r) if r.status().is_success() => r,
            _ => return false,
        };
        response
            .json::<HealthResponse>()
            .map(|h| h.status == "ok")
            .unwrap_or(false)
    }

    /// Tunables the server accepts, or `None` if it does not say
    pub fn bot_params(&self) -> Option<Vec<ParamDescriptor>> {
        let response = self.http.get(self.url("/bot-params")).send().ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.json::<BotParamsResponse>().ok().map(|r| r.params)
    }
}
