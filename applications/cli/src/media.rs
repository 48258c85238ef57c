//! Headless media output.
//!
//! `ProbeOutput` does not decode audio. A load opens the stream over HTTP and
//! reports success or failure from the response; from then on a wall clock
//! stands in for the playhead. The track length is estimated from the
//! stream size and an assumed bitrate.

use leakify_client::LeakifyClient;
use leakify_playback::{LoadTicket, MediaErrorKind, MediaEvent, MediaOutput, MediaSource};
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use url::Url;

/// Media notification tagged with the load it belongs to
pub type TaggedMediaEvent = (LoadTicket, MediaEvent);

/// Wall-clock playhead of the loaded stream
#[derive(Debug, Default, Clone)]
struct Playhead {
    running_since: Option<Instant>,
    offset: Duration,
    duration: Option<Duration>,
    live: bool,
    ended: bool,
}

impl Playhead {
    fn position(&self, now: Instant) -> Duration {
        let elapsed = self
            .running_since
            .map_or(Duration::ZERO, |since| now.saturating_duration_since(since));
        let position = self.offset + elapsed;
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    fn run(&mut self, now: Instant) {
        if self.live && !self.ended && self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    fn hold(&mut self, now: Instant) {
        self.offset = self.position(now);
        self.running_since = None;
    }
}

pub struct ProbeOutput {
    client: LeakifyClient,
    events: UnboundedSender<TaggedMediaEvent>,
    bitrate_kbps: u32,
    current: Option<LoadTicket>,
    playhead: Playhead,
    probe: Option<JoinHandle<()>>,
    gain: f32,
}

impl ProbeOutput {
    pub fn new(
        client: LeakifyClient,
        events: UnboundedSender<TaggedMediaEvent>,
        bitrate_kbps: u32,
    ) -> Self {
        Self {
            client,
            events,
            bitrate_kbps,
            current: None,
            playhead: Playhead::default(),
            probe: None,
            gain: 1.0,
        }
    }

    /// Current output gain, 0.0-1.0
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Let the output see its own probe result before the engine does.
    ///
    /// `Started` starts the clock and `MetadataLoaded` bounds it.
    pub fn observe(&mut self, ticket: LoadTicket, event: &MediaEvent, now: Instant) {
        if self.current != Some(ticket) {
            return;
        }
        match event {
            MediaEvent::Started => {
                self.playhead.live = true;
                self.playhead.run(now);
            }
            MediaEvent::MetadataLoaded { duration } => self.playhead.duration = Some(*duration),
            MediaEvent::Failed { .. } => self.playhead = Playhead::default(),
            MediaEvent::TimeUpdate { .. } | MediaEvent::Ended => {}
        }
    }

    /// Advance the clock: a position report while running, and `Ended` once
    /// the estimated length is reached.
    pub fn poll(&mut self, now: Instant) -> Vec<TaggedMediaEvent> {
        let Some(ticket) = self.current else {
            return Vec::new();
        };
        if self.playhead.running_since.is_none() {
            return Vec::new();
        }

        let position = self.playhead.position(now);
        let mut events = vec![(ticket, MediaEvent::TimeUpdate { position })];

        if self.playhead.duration.is_some_and(|d| position >= d) {
            self.playhead.hold(now);
            self.playhead.ended = true;
            events.push((ticket, MediaEvent::Ended));
        }
        events
    }

    fn resolve(&self, source: &MediaSource) -> Option<Url> {
        let resolved = match source {
            MediaSource::Url(url) => self.client.resolve(url),
            MediaSource::Endpoint { filename } => self.client.play_url(filename),
        };
        match resolved {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "Could not build stream URL");
                None
            }
        }
    }
}

impl MediaOutput for ProbeOutput {
    fn load(&mut self, ticket: LoadTicket, source: &MediaSource) {
        if let Some(previous) = self.probe.take() {
            previous.abort();
        }
        self.current = Some(ticket);
        self.playhead = Playhead::default();

        let Some(url) = self.resolve(source) else {
            let event = MediaEvent::Failed {
                kind: MediaErrorKind::Other,
                message: "invalid stream URL".to_string(),
            };
            let _ = self.events.send((ticket, event));
            return;
        };

        let http = self.client.http().clone();
        let events = self.events.clone();
        let bitrate_kbps = self.bitrate_kbps;
        self.probe = Some(tokio::spawn(async move {
            for event in probe(&http, url, bitrate_kbps).await {
                if events.send((ticket, event)).is_err() {
                    break;
                }
            }
        }));
    }

    fn play(&mut self) {
        self.playhead.ended = false;
        self.playhead.run(Instant::now());
    }

    fn pause(&mut self) {
        self.playhead.hold(Instant::now());
    }

    fn seek(&mut self, position: Duration) {
        let now = Instant::now();
        let running = self.playhead.running_since.is_some();
        self.playhead.running_since = None;
        self.playhead.offset = position;
        self.playhead.ended = false;
        if running {
            self.playhead.run(now);
        }
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }
}

/// Open `url` and translate the response into media events.
///
/// Only the headers are read; the body is dropped unread.
pub async fn probe(http: &reqwest::Client, url: Url, bitrate_kbps: u32) -> Vec<MediaEvent> {
    tracing::debug!(url = %url, "Probing stream");

    let response = match http.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return vec![MediaEvent::Failed {
                kind: MediaErrorKind::Network,
                message: e.to_string(),
            }]
        }
    };

    let status = response.status();
    if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
        return vec![MediaEvent::Failed {
            kind: MediaErrorKind::FormatUnsupported,
            message: format!("HTTP {status}"),
        }];
    }
    if !status.is_success() {
        return vec![MediaEvent::Failed {
            kind: MediaErrorKind::Network,
            message: format!("HTTP {status}"),
        }];
    }

    let mut events = Vec::with_capacity(2);
    if let Some(duration) = response
        .content_length()
        .and_then(|bytes| estimate_duration(bytes, bitrate_kbps))
    {
        events.push(MediaEvent::MetadataLoaded { duration });
    }
    events.push(MediaEvent::Started);
    events
}

/// Length of `bytes` of audio at a constant bitrate
pub fn estimate_duration(bytes: u64, bitrate_kbps: u32) -> Option<Duration> {
    if bitrate_kbps == 0 || bytes == 0 {
        return None;
    }
    let bytes_per_sec = f64::from(bitrate_kbps) * 1000.0 / 8.0;
    Some(Duration::from_secs_f64(bytes as f64 / bytes_per_sec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leakify_client::ClientConfig;
    use tokio::sync::mpsc;

    fn output() -> (ProbeOutput, mpsc::UnboundedReceiver<TaggedMediaEvent>) {
        let client = LeakifyClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        (ProbeOutput::new(client, tx, 128), rx)
    }

    #[test]
    fn test_estimate_duration() {
        // 128 kbps is 16000 bytes per second
        assert_eq!(
            estimate_duration(160_000, 128),
            Some(Duration::from_secs(10))
        );
        assert_eq!(estimate_duration(0, 128), None);
        assert_eq!(estimate_duration(1000, 0), None);
    }

    #[test]
    fn test_playhead_clamps_to_duration() {
        let start = Instant::now();
        let mut playhead = Playhead {
            live: true,
            duration: Some(Duration::from_secs(5)),
            ..Playhead::default()
        };
        playhead.run(start);
        assert_eq!(
            playhead.position(start + Duration::from_secs(2)),
            Duration::from_secs(2)
        );
        assert_eq!(
            playhead.position(start + Duration::from_secs(9)),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_poll_reports_progress_then_end_once() {
        let (mut out, _rx) = output();
        let start = Instant::now();
        let ticket = LoadTicket(1);
        out.current = Some(ticket);

        assert!(out.poll(start).is_empty());

        out.observe(
            ticket,
            &MediaEvent::MetadataLoaded {
                duration: Duration::from_secs(4),
            },
            start,
        );
        out.observe(ticket, &MediaEvent::Started, start);

        let events = out.poll(start + Duration::from_secs(1));
        assert_eq!(
            events,
            vec![(
                ticket,
                MediaEvent::TimeUpdate {
                    position: Duration::from_secs(1)
                }
            )]
        );

        let events = out.poll(start + Duration::from_secs(5));
        assert_eq!(events.last(), Some(&(ticket, MediaEvent::Ended)));

        assert!(out.poll(start + Duration::from_secs(6)).is_empty());
    }

    #[test]
    fn test_observe_ignores_other_tickets() {
        let (mut out, _rx) = output();
        out.current = Some(LoadTicket(2));
        out.observe(LoadTicket(1), &MediaEvent::Started, Instant::now());
        assert!(!out.playhead.live);
    }

    #[test]
    fn test_pause_holds_position() {
        let (mut out, _rx) = output();
        let ticket = LoadTicket(1);
        out.current = Some(ticket);
        out.observe(ticket, &MediaEvent::Started, Instant::now());

        out.pause();
        assert!(out.poll(Instant::now() + Duration::from_secs(3)).is_empty());
        assert!(out.playhead.offset < Duration::from_secs(1));

        out.seek(Duration::from_secs(30));
        assert_eq!(out.playhead.offset, Duration::from_secs(30));
        assert!(out.playhead.running_since.is_none());
    }

    #[test]
    fn test_gain_is_clamped() {
        let (mut out, _rx) = output();
        out.set_gain(1.7);
        assert_eq!(out.gain(), 1.0);
        out.set_gain(0.25);
        assert_eq!(out.gain(), 0.25);
    }
}
