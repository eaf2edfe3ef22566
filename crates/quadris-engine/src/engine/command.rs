use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseCommandError;

/// An input command, mapped one-to-one onto a [`Board`](crate::Board) operation.
///
/// Commands parse from their kebab-case name (`move-left`, `hard-drop`, ...)
/// or from the name of the key bound to them in the classic layout
/// (`left`, `right`, `down`, `up`, `z`, `space`, `p`, `g`, `enter`).
/// `tick` is accepted as the gravity step.
///
/// # Example
///
/// ```
/// use quadris_engine::Command;
///
/// assert_eq!("hard-drop".parse(), Ok(Command::HardDrop));
/// assert_eq!("up".parse(), Ok(Command::RotateRight));
/// assert_eq!(Command::SoftDrop.to_string(), "soft-drop");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    #[display("move-left")]
    MoveLeft,
    #[display("move-right")]
    MoveRight,
    #[display("soft-drop")]
    SoftDrop,
    #[display("hard-drop")]
    HardDrop,
    #[display("rotate-left")]
    RotateLeft,
    #[display("rotate-right")]
    RotateRight,
    #[display("toggle-pause")]
    TogglePause,
    #[display("toggle-ghost")]
    ToggleGhost,
    #[display("start")]
    Start,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::HardDrop,
        Command::RotateLeft,
        Command::RotateRight,
        Command::TogglePause,
        Command::ToggleGhost,
        Command::Start,
    ];
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let command = match name.as_str() {
            "move-left" | "left" => Command::MoveLeft,
            "move-right" | "right" => Command::MoveRight,
            "soft-drop" | "down" | "tick" => Command::SoftDrop,
            "hard-drop" | "space" => Command::HardDrop,
            "rotate-left" | "z" => Command::RotateLeft,
            "rotate-right" | "up" => Command::RotateRight,
            "toggle-pause" | "pause" | "p" => Command::TogglePause,
            "toggle-ghost" | "ghost" | "g" => Command::ToggleGhost,
            "start" | "enter" => Command::Start,
            _ => return Err(ParseCommandError(s.trim().to_owned())),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parses_back() {
        for command in Command::ALL {
            assert_eq!(command.to_string().parse(), Ok(command));
        }
    }

    #[test]
    fn test_key_aliases() {
        assert_eq!("LEFT".parse(), Ok(Command::MoveLeft));
        assert_eq!(" space ".parse(), Ok(Command::HardDrop));
        assert_eq!("z".parse(), Ok(Command::RotateLeft));
        assert_eq!("tick".parse(), Ok(Command::SoftDrop));
        assert_eq!("enter".parse(), Ok(Command::Start));
    }

    #[test]
    fn test_unknown_command() {
        let err = "jump".parse::<Command>().unwrap_err();
        assert_eq!(err, ParseCommandError("jump".to_owned()));
        assert_eq!(err.to_string(), "unknown command: jump");
    }

    #[test]
    fn test_serde_names_match_display() {
        for command in Command::ALL {
            let serialized = serde_json::to_string(&command).unwrap();
            assert_eq!(serialized, format!("\"{command}\""));
        }
    }
}
