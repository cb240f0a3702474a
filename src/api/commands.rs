//! Terminal commands
//!
//! One command per input line. Anything that is not a keyword is taken as a
//! new input value, so typing `12.5` is the same as `value 12.5`.

use std::str::FromStr;

use crate::core::session::ConverterSession;
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::Category;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectCategory(Category),
    SetValue(String),
    SetFromUnit(String),
    SetToUnit(String),
    Swap,
    Refresh,
    ListUnits,
    Show,
    Help,
    Quit,
}

/// What the front end should do after a command was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Render,
    /// Render, then start a rate refresh in the background.
    RefreshRequested,
    ListUnits,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Show);
        }

        let (keyword, arg) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        let required = |what: &str| -> AppResult<String> {
            if arg.is_empty() {
                Err(AppError::Validation(format!("Missing {} after '{}'", what, keyword)))
            } else {
                Ok(arg.to_string())
            }
        };

        match keyword.to_ascii_lowercase().as_str() {
            "category" | "cat" => Ok(Command::SelectCategory(required("category")?.parse()?)),
            "value" | "v" => Ok(Command::SetValue(arg.to_string())),
            "from" => Ok(Command::SetFromUnit(required("unit")?.to_ascii_uppercase())),
            "to" => Ok(Command::SetToUnit(required("unit")?.to_ascii_uppercase())),
            "swap" => Ok(Command::Swap),
            "refresh" => Ok(Command::Refresh),
            "units" => Ok(Command::ListUnits),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Ok(Command::SetValue(line.to_string())),
        }
    }
}

pub fn apply(session: &mut ConverterSession, command: Command) -> AppResult<Outcome> {
    tracing::debug!(?command, "[commands] apply");
    match command {
        Command::SelectCategory(category) => {
            if session.select_category(category) {
                Ok(Outcome::RefreshRequested)
            } else {
                Ok(Outcome::Render)
            }
        }
        Command::SetValue(raw) => {
            session.set_value(raw);
            Ok(Outcome::Render)
        }
        Command::SetFromUnit(id) => {
            session.set_from_unit(&id)?;
            Ok(Outcome::Render)
        }
        Command::SetToUnit(id) => {
            session.set_to_unit(&id)?;
            Ok(Outcome::Render)
        }
        Command::Swap => {
            session.swap();
            Ok(Outcome::Render)
        }
        Command::Refresh => Ok(Outcome::RefreshRequested),
        Command::ListUnits => Ok(Outcome::ListUnits),
        Command::Show => Ok(Outcome::Render),
        Command::Help => Ok(Outcome::Help),
        Command::Quit => Ok(Outcome::Quit),
    }
}
