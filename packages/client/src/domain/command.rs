//! Input line parsing.

use crate::error::ClientError;

/// Number of messages fetched when no limit is given
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain line: send to the current room
    Say(String),
    Join(String),
    /// Leave the given room, or the current one
    Leave(Option<String>),
    /// Open the direct room with a user
    Direct(String),
    Group {
        name: String,
        participants: Vec<String>,
    },
    Who,
    /// Every known user, online or not
    Users,
    Rooms,
    History(usize),
    Help,
    Quit,
}

/// Parse one input line.
///
/// Lines not starting with `/` are chat text.
pub fn parse_command(line: &str) -> Result<Command, ClientError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    match (name, args.as_slice()) {
        ("join", [room]) => Ok(Command::Join(room.to_string())),
        ("leave", []) => Ok(Command::Leave(None)),
        ("leave", [room]) => Ok(Command::Leave(Some(room.to_string()))),
        ("dm", [user]) => Ok(Command::Direct(user.to_string())),
        ("group", [name, participants @ ..]) if !participants.is_empty() => Ok(Command::Group {
            name: name.to_string(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }),
        ("who", []) => Ok(Command::Who),
        ("users", []) => Ok(Command::Users),
        ("rooms", []) => Ok(Command::Rooms),
        ("history", []) => Ok(Command::History(DEFAULT_HISTORY_LIMIT)),
        ("history", [limit]) => limit
            .parse()
            .map(Command::History)
            .map_err(|_| ClientError::InvalidCommand(format!("not a number: {}", limit))),
        ("help", []) => Ok(Command::Help),
        ("quit", []) | ("exit", []) => Ok(Command::Quit),
        ("join" | "leave" | "dm" | "group" | "who" | "rooms" | "history" | "help", _) => Err(
            ClientError::InvalidCommand(format!("wrong arguments for /{}; try /help", name)),
        ),
        _ => Err(ClientError::InvalidCommand(format!("unknown command /{}", name))),
    }
}
