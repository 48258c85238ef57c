//! Interactive command parsing.
//!
//! Each stdin line becomes an [`Action`]. Track numbers are 1-based as
//! printed by the listings; everything else maps one-to-one onto a
//! [`Command`].

use crate::error::{CliError, Result};
use leakify_core::Scope;
use leakify_playback::sleep_timer::MAX_DELAY;
use leakify_playback::Command;
use std::time::Duration;

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hand straight to the session
    Dispatch(Command),
    /// Narrow or widen the view, keeping the other half of the filter
    Filter(FilterChange),
    Show(Listing),
    /// Refetch the song list
    Refresh,
    Login { user: String, pass: String },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Scope(Scope),
    Search(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Songs,
    Queue,
    Recent,
    Liked,
    NowPlaying,
    Artists,
    Tags,
}

pub const HELP: &str = "\
commands:
  play N          play track N of the list     next | prev
  pause           play/pause                   shuffle | repeat
  seek F          jump to fraction F (0-1)     vol N (0-100)
  like [ID]       like/unlike current or ID    sleep MIN | sleep off
  artist NAME     only songs by NAME           tag NAME
  search TEXT     search (empty clears)        all
  ls | queue | recent | liked | now | artists | tags
  clear recent | clear likes
  login USER PASS | refresh | help | quit";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Action>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let action = match verb.to_ascii_lowercase().as_str() {
        "play" | "p" => {
            let number = required(rest, "play", "a track number")?;
            let number: usize = number
                .parse()
                .map_err(|_| CliError::invalid("play", format!("{number:?} is not a number")))?;
            if number == 0 {
                return Err(CliError::invalid("play", "tracks are numbered from 1"));
            }
            Action::Dispatch(Command::SelectTrack(number - 1))
        }
        "next" | "n" => Action::Dispatch(Command::Next),
        "prev" | "previous" | "b" => Action::Dispatch(Command::Previous),
        "pause" | "toggle" | "space" => Action::Dispatch(Command::TogglePlayPause),
        "shuffle" => Action::Dispatch(Command::ToggleShuffle),
        "repeat" => Action::Dispatch(Command::ToggleRepeat),
        "seek" => {
            let value = required(rest, "seek", "a fraction between 0 and 1")?;
            let fraction: f32 = value
                .parse()
                .map_err(|_| CliError::invalid("seek", format!("{value:?} is not a number")))?;
            Action::Dispatch(Command::Seek(fraction))
        }
        "vol" | "volume" => {
            let value = required(rest, "vol", "a level from 0 to 100")?;
            let level: u8 = value
                .parse()
                .ok()
                .filter(|level| *level <= 100)
                .ok_or_else(|| CliError::invalid("vol", format!("{value:?} is not 0-100")))?;
            Action::Dispatch(Command::SetVolume(level))
        }
        "like" => {
            if rest.is_empty() {
                Action::Dispatch(Command::ToggleLikeCurrent)
            } else {
                Action::Dispatch(Command::ToggleLike(rest.to_string()))
            }
        }
        "sleep" => {
            let value = required(rest, "sleep", "minutes or `off`")?;
            if value.eq_ignore_ascii_case("off") {
                Action::Dispatch(Command::SetSleepTimer(None))
            } else {
                let minutes: u64 = value.parse().ok().filter(|m| *m > 0).ok_or_else(|| {
                    CliError::invalid("sleep", format!("{value:?} is not a number of minutes"))
                })?;
                let delay = minutes
                    .checked_mul(60)
                    .map(Duration::from_secs)
                    .filter(|delay| *delay <= MAX_DELAY)
                    .ok_or_else(|| {
                        CliError::invalid(
                            "sleep",
                            format!("at most {} minutes", MAX_DELAY.as_secs() / 60),
                        )
                    })?;
                Action::Dispatch(Command::SetSleepTimer(Some(delay)))
            }
        }
        "artist" => {
            let name = required(rest, "artist", "an artist name")?;
            Action::Filter(FilterChange::Scope(Scope::Artist(name.to_string())))
        }
        "tag" => {
            let label = required(rest, "tag", "a tag")?;
            Action::Filter(FilterChange::Scope(Scope::Tag(label.to_string())))
        }
        "all" => Action::Filter(FilterChange::Scope(Scope::All)),
        "search" | "/" => Action::Filter(FilterChange::Search(rest.to_string())),
        "ls" | "songs" | "list" => Action::Show(Listing::Songs),
        "queue" | "q" => Action::Show(Listing::Queue),
        "recent" => Action::Show(Listing::Recent),
        "liked" | "likes" => Action::Show(Listing::Liked),
        "now" => Action::Show(Listing::NowPlaying),
        "artists" => Action::Show(Listing::Artists),
        "tags" => Action::Show(Listing::Tags),
        "clear" => match rest {
            "recent" => Action::Dispatch(Command::ClearRecent),
            "likes" | "liked" => Action::Dispatch(Command::ClearLikes),
            _ => return Err(CliError::invalid("clear", "expected `recent` or `likes`")),
        },
        "login" => {
            let (user, pass) = rest
                .split_once(char::is_whitespace)
                .map(|(user, pass)| (user.trim(), pass.trim()))
                .filter(|(user, pass)| !user.is_empty() && !pass.is_empty())
                .ok_or(CliError::MissingArgument {
                    command: "login",
                    expected: "a user and a password",
                })?;
            Action::Login {
                user: user.to_string(),
                pass: pass.to_string(),
            }
        }
        "refresh" | "reload" => Action::Refresh,
        "help" | "?" => Action::Help,
        "quit" | "exit" => Action::Quit,
        other => return Err(CliError::UnknownCommand(other.to_string())),
    };
    Ok(Some(action))
}

fn required<'a>(rest: &'a str, command: &'static str, expected: &'static str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(CliError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}
