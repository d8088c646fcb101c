//! User intents and the terminal command language.
//!
//! Each line typed on stdin is one intent:
//!
//! | input                              | intent                         |
//! |------------------------------------|--------------------------------|
//! | `sit` / `stand`                    | move to the preset             |
//! | `up` / `down`                      | begin press-and-hold           |
//! | `release`, `stop`, empty line      | end press-and-hold             |
//! | `full-up` / `full-down`            | same as `stand` / `sit`        |
//! | `set sit 720`                      | edit a preset                  |
//! | `show`, `help`, `quit`             | re-render, usage, exit         |

use thiserror::Error;

use desk_core::PresetKind;

/// Usage text printed for `help` and on start-up.
pub const HELP: &str = "\
commands:
  sit | stand                 move to the sit / stand preset
  up | down                   start moving (repeats until release)
  release | stop | <enter>    stop moving
  full-up | full-down         same as stand / sit
  set <preset> <value>        preset: sit, stand, sit-duration, stand-duration
  show                        print the current state
  help                        print this text
  quit                        exit";

/// Press-and-hold gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Up,
    Down,
    FullUp,
    FullDown,
}

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Sit,
    Stand,
    Start(Gesture),
    Release,
    EditPreset(PresetKind, f64),
    Show,
    Help,
    Quit,
}

/// Error type for terminal input that does not parse.
#[derive(Debug, Error, PartialEq)]
pub enum IntentError {
    #[error("unknown command '{0}' (type 'help')")]
    UnknownCommand(String),
    #[error("unknown preset '{0}' (sit, stand, sit-duration, stand-duration)")]
    UnknownPreset(String),
    #[error("usage: set <preset> <value>")]
    MissingArgument,
    #[error("'{0}' is not a finite number")]
    InvalidNumber(String),
}

/// Parses one line of terminal input.
///
/// # Errors
///
/// Returns [`IntentError`] for unknown words, unknown presets, missing
/// arguments, and values that are not finite numbers.
pub fn parse_intent(line: &str) -> Result<Intent, IntentError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Intent::Release);
    };

    let intent = match head.to_ascii_lowercase().as_str() {
        "sit" => Intent::Sit,
        "stand" => Intent::Stand,
        "up" => Intent::Start(Gesture::Up),
        "down" => Intent::Start(Gesture::Down),
        "full-up" | "fullup" => Intent::Start(Gesture::FullUp),
        "full-down" | "fulldown" => Intent::Start(Gesture::FullDown),
        "release" | "stop" => Intent::Release,
        "show" => Intent::Show,
        "help" | "?" => Intent::Help,
        "quit" | "exit" => Intent::Quit,
        "set" => {
            let preset = words.next().ok_or(IntentError::MissingArgument)?;
            let value = words.next().ok_or(IntentError::MissingArgument)?;
            Intent::EditPreset(parse_preset(preset)?, parse_value(value)?)
        }
        other => return Err(IntentError::UnknownCommand(other.to_string())),
    };
    Ok(intent)
}

fn parse_preset(word: &str) -> Result<PresetKind, IntentError> {
    match word.to_ascii_lowercase().replace('_', "-").as_str() {
        "sit" => Ok(PresetKind::Sit),
        "stand" => Ok(PresetKind::Stand),
        "sit-duration" => Ok(PresetKind::SitDuration),
        "stand-duration" => Ok(PresetKind::StandDuration),
        _ => Err(IntentError::UnknownPreset(word.to_string())),
    }
}

fn parse_value(word: &str) -> Result<f64, IntentError> {
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| IntentError::InvalidNumber(word.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_words() {
        assert_eq!(parse_intent("sit"), Ok(Intent::Sit));
        assert_eq!(parse_intent("stand"), Ok(Intent::Stand));
        assert_eq!(parse_intent("show"), Ok(Intent::Show));
        assert_eq!(parse_intent("quit"), Ok(Intent::Quit));
        assert_eq!(parse_intent("help"), Ok(Intent::Help));
    }

    #[test]
    fn test_parse_gestures() {
        assert_eq!(parse_intent("up"), Ok(Intent::Start(Gesture::Up)));
        assert_eq!(parse_intent("down"), Ok(Intent::Start(Gesture::Down)));
        assert_eq!(parse_intent("full-up"), Ok(Intent::Start(Gesture::FullUp)));
        assert_eq!(parse_intent("fullDown"), Ok(Intent::Start(Gesture::FullDown)));
    }

    #[test]
    fn test_empty_line_releases() {
        assert_eq!(parse_intent(""), Ok(Intent::Release));
        assert_eq!(parse_intent("   "), Ok(Intent::Release));
        assert_eq!(parse_intent("stop"), Ok(Intent::Release));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(parse_intent("  SIT  "), Ok(Intent::Sit));
    }

    #[test]
    fn test_parse_set_preset() {
        assert_eq!(
            parse_intent("set sit 720"),
            Ok(Intent::EditPreset(PresetKind::Sit, 720.0))
        );
        assert_eq!(
            parse_intent("set stand_duration 12.5"),
            Ok(Intent::EditPreset(PresetKind::StandDuration, 12.5))
        );
    }

    #[test]
    fn test_parse_set_missing_value() {
        assert_eq!(parse_intent("set sit"), Err(IntentError::MissingArgument));
        assert_eq!(parse_intent("set"), Err(IntentError::MissingArgument));
    }

    #[test]
    fn test_parse_set_rejects_non_numeric_value() {
        assert_eq!(
            parse_intent("set sit tall"),
            Err(IntentError::InvalidNumber("tall".to_string()))
        );
        assert_eq!(
            parse_intent("set sit NaN"),
            Err(IntentError::InvalidNumber("NaN".to_string()))
        );
    }

    #[test]
    fn test_parse_set_rejects_unknown_preset() {
        assert_eq!(
            parse_intent("set lie 10"),
            Err(IntentError::UnknownPreset("lie".to_string()))
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse_intent("jump"),
            Err(IntentError::UnknownCommand("jump".to_string()))
        );
    }
}
