use serde::{Deserialize, Serialize};

/// Lifecycle state of a game.
///
/// ```text
/// NotStarted --start--> Playing <--toggle_pause--> Paused
///                          |
///                   spawn blocked
///                          v
///                       GameOver --start--> Playing
/// ```
///
/// `start` is accepted in every state. `Paused` and `GameOver` are only
/// entered from `Playing`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    #[default]
    #[display("not-started")]
    NotStarted,
    #[display("playing")]
    Playing,
    #[display("paused")]
    Paused,
    #[display("game-over")]
    GameOver,
}

impl SessionState {
    /// Returns `true` once a game has been started, including paused and finished games.
    #[must_use]
    pub fn is_started(self) -> bool {
        !self.is_not_started()
    }

    /// State after a pause toggle. Only `Playing` and `Paused` change.
    #[must_use]
    pub fn toggled_pause(self) -> Self {
        match self {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            other @ (SessionState::NotStarted | SessionState::GameOver) => other,
        }
    }
}
