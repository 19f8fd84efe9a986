//! GameSetup - board size and seating for a new game

use crate::error::CoreError;
use crate::grid::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Seat colors, assigned in player order when a config leaves color unset
pub const PLAYER_COLORS: [(&str, &str); 8] = [
    ("Crimson", "#dc3545"),
    ("Royal Blue", "#4169e1"),
    ("Emerald", "#2ecc71"),
    ("Violet", "#9b59b6"),
    ("Tangerine", "#e67e22"),
    ("Teal", "#1abc9c"),
    ("Coral", "#e91e63"),
    ("Golden", "#f1c40f"),
];

/// Who decides a player's moves
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerKind {
    Human,
    Bot {
        strategy: String,
    },
    Remote {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<serde_json::Value>,
    },
}

impl PlayerKind {
    pub fn bot(strategy: &str) -> Self {
        PlayerKind::Bot {
            strategy: strategy.to_string(),
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, PlayerKind::Human)
    }

    /// Strategy id for local bots
    pub fn strategy_id(&self) -> Option<&str> {
        match self {
            PlayerKind::Bot { strategy } => Some(strategy),
            _ => None,
        }
    }
}

/// One seat at the table
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub kind: PlayerKind,
}

impl PlayerConfig {
    pub fn new(name: &str, kind: PlayerKind) -> Self {
        Self {
            name: name.to_string(),
            color: None,
            kind,
        }
    }

    pub fn human(name: &str) -> Self {
        Self::new(name, PlayerKind::Human)
    }

    pub fn bot(name: &str, strategy: &str) -> Self {
        Self::new(name, PlayerKind::bot(strategy))
    }
}

/// Full game configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSetup {
    #[serde(default = "default_board_size")]
    pub board_size: i8,
    pub players: Vec<PlayerConfig>,
}

fn default_board_size() -> i8 {
    DEFAULT_BOARD_SIZE
}

impl GameSetup {
    pub fn new(board_size: i8, players: Vec<PlayerConfig>) -> Self {
        Self {
            board_size,
            players,
        }
    }

    /// Check board size and seat count
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(CoreError::BoardSize(self.board_size as i64));
        }
        if !(2..=4).contains(&self.players.len()) {
            return Err(CoreError::PlayerCount(self.players.len()));
        }
        Ok(())
    }

    /// Color for seat `index`: configured, else palette
    pub fn color_for(&self, index: usize) -> String {
        self.players
            .get(index)
            .and_then(|p| p.color.clone())
            .unwrap_or_else(|| PLAYER_COLORS[index % PLAYER_COLORS.len()].1.to_string())
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading game setup {}", path.display()))?;
        let setup: GameSetup = serde_json::from_str(&content)
            .with_context(|| format!("parsing game setup {}", path.display()))?;
        setup.validate()?;
        Ok(setup)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for GameSetup {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            players: vec![PlayerConfig::human("Player 1"), PlayerConfig::bot("Bot", "hard")],
        }
    }
}
