//! Line commands typed at the prompt, mapped onto controller events.

use client_core::UiEvent;
use shared::domain::ItemId;

pub const HELP: &str = "\
commands:
  + <id> | inc <id>   stage one more unit
  - <id> | dec <id>   stage one less unit
  add <id>            commit the staged amount to the cart
  del <id>            remove a cart line
  checkout            remove every cart line
  refresh             reload inventory and cart
  help                show this text
  quit                exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Event(UiEvent),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnknownCommand(String),
    MissingId(&'static str),
    InvalidId(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
            ParseError::UnknownCommand(word) => write!(f, "unknown command '{word}' (try 'help')"),
            ParseError::MissingId(word) => write!(f, "'{word}' needs an item id"),
            ParseError::InvalidId(raw) => write!(f, "'{raw}' is not an item id"),
        }
    }
}

pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Err(ParseError::Empty);
    };

    let mut with_id = |name: &'static str,
                       make: fn(ItemId) -> UiEvent|
     -> Result<Command, ParseError> {
        let raw = words.next().ok_or(ParseError::MissingId(name))?;
        let id = raw
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidId(raw.to_string()))?;
        Ok(Command::Event(make(ItemId(id))))
    };

    match word.to_ascii_lowercase().as_str() {
        "+" | "inc" => with_id("inc", UiEvent::Increase),
        "-" | "dec" => with_id("dec", UiEvent::Decrease),
        "add" => with_id("add", UiEvent::AddToCart),
        "del" | "delete" => with_id("del", UiEvent::Delete),
        "checkout" => Ok(Command::Event(UiEvent::Checkout)),
        "refresh" => Ok(Command::Event(UiEvent::Refresh)),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}
