//! Text rendering for the terminal.

use leakify_core::{Catalog, LibraryStatus, Song, SongRecord};
use leakify_playback::{NowPlaying, PlaybackEvent, PlaybackState, Upcoming};
use std::fmt::Write as _;
use std::time::Duration;

/// `m:ss`, or `h:mm:ss` past an hour
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// `Artist - Title [TAG]`
pub fn song_label(song: &Song) -> String {
    let mut label = if song.artist.is_empty() {
        song.title.clone()
    } else {
        format!("{} - {}", song.artist, song.title)
    };
    if let Some(tag) = &song.tag {
        let _ = write!(label, " [{tag}]");
    }
    label
}

fn label_for(catalog: &Catalog, id: &str) -> String {
    catalog.find(id).map_or_else(|| id.to_string(), song_label)
}

/// One line for an engine event, or `None` for events not worth printing
pub fn describe_event(event: &PlaybackEvent, catalog: &Catalog) -> Option<String> {
    let line = match event {
        PlaybackEvent::StateChanged { state } => match state {
            PlaybackState::Paused => "paused".to_string(),
            PlaybackState::Stopped => "stopped".to_string(),
            _ => return None,
        },
        PlaybackEvent::TrackChanged { song_id, .. } => {
            format!("loading {}", label_for(catalog, song_id))
        }
        PlaybackEvent::PlaybackStarted { song_id } => {
            format!("▶ {}", label_for(catalog, song_id))
        }
        PlaybackEvent::PositionUpdate { .. } => return None,
        PlaybackEvent::VolumeChanged { level } => format!("volume {level}"),
        PlaybackEvent::ModesChanged { shuffle, repeat } => format!(
            "shuffle {}, repeat {}",
            on_off(*shuffle),
            on_off(*repeat)
        ),
        PlaybackEvent::UrlRefreshRequested { song_id, .. } => {
            format!("stream failed, fetching a fresh link for {song_id}")
        }
        PlaybackEvent::PlaybackFailed { song_id, reason } => {
            format!("could not play {}: {reason}", label_for(catalog, song_id))
        }
        PlaybackEvent::LikeChanged { song_id, liked } => {
            let verb = if *liked { "liked" } else { "unliked" };
            format!("{verb} {}", label_for(catalog, song_id))
        }
        PlaybackEvent::RecentChanged { .. } => return None,
        PlaybackEvent::LibraryChanged { status } => describe_status(status),
        PlaybackEvent::AuthRequired => {
            "login required: use `login USER PASS`".to_string()
        }
        PlaybackEvent::SleepTimerChanged { remaining_secs } => match remaining_secs {
            Some(secs) => format!(
                "sleep timer set, {} left",
                format_duration(Duration::from_secs(*secs))
            ),
            None => "sleep timer off".to_string(),
        },
        PlaybackEvent::SleepTimerExpired => "sleep timer expired, good night".to_string(),
        PlaybackEvent::Error { message } => format!("error: {message}"),
    };
    Some(line)
}

pub fn describe_status(status: &LibraryStatus) -> String {
    match status {
        LibraryStatus::NotLoaded => "library not loaded".to_string(),
        LibraryStatus::LoadFailed { reason } => format!("library unavailable: {reason}"),
        LibraryStatus::NoMatches => "no songs match".to_string(),
        LibraryStatus::Ready { visible, total } if visible == total => {
            format!("{total} songs")
        }
        LibraryStatus::Ready { visible, total } => format!("{visible} of {total} songs"),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Numbered listing of the filtered view, marking the current track
pub fn song_list(catalog: &Catalog, current: Option<usize>) -> String {
    let mut out = String::new();
    for (index, song) in catalog.view().enumerate() {
        let marker = if Some(index) == current { '>' } else { ' ' };
        let _ = writeln!(out, "{marker}{:>4}  {}", index + 1, song_label(song));
    }
    if out.is_empty() {
        out.push_str(&describe_status(&catalog.status()));
        out.push('\n');
    }
    out
}

pub fn now_playing(now: &NowPlaying) -> String {
    let Some(song) = &now.song else {
        return "nothing loaded\n".to_string();
    };

    let mut out = String::new();
    let heart = if now.liked { " ♥" } else { "" };
    let _ = writeln!(out, "{} ({}){heart}", song_label(song), now.state);

    let position = format_duration(now.position);
    let total = now.duration.map_or_else(|| "?".to_string(), format_duration);
    let _ = write!(
        out,
        "{position} / {total}  vol {}  shuffle {}  repeat {}",
        now.volume,
        on_off(now.shuffle),
        on_off(now.repeat)
    );
    if let Some(remaining) = now.sleep_remaining {
        let _ = write!(out, "  sleep in {}", format_duration(remaining));
    }
    if let Some(index) = now.index {
        let _ = write!(out, "  #{}", index + 1);
    }
    out.push('\n');
    out
}

pub fn upcoming(upcoming: &Upcoming<'_>) -> String {
    if upcoming.songs.is_empty() {
        return "queue is empty\n".to_string();
    }
    let mut out = String::new();
    if upcoming.shuffled {
        out.push_str("(shuffle is on, order will differ)\n");
    }
    for (n, song) in upcoming.songs.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", n + 1, song_label(song));
    }
    out
}

pub fn recent(records: &[&SongRecord]) -> String {
    if records.is_empty() {
        return "nothing played yet\n".to_string();
    }
    let mut out = String::new();
    for record in records {
        let when = record.played_at.format("%Y-%m-%d %H:%M");
        let _ = if record.artist.is_empty() {
            writeln!(out, "{when}  {}", record.display)
        } else {
            writeln!(out, "{when}  {} - {}", record.artist, record.display)
        };
    }
    out
}

pub fn names(title: &str, names: &[String]) -> String {
    if names.is_empty() {
        return format!("no {title}\n");
    }
    let mut out = String::new();
    for name in names {
        let _ = writeln!(out, "{name}");
    }
    out
}
