//! Playback controller for synthesized replies. The actual audio device sits
//! behind [`AudioPlayback`] so the controller runs anywhere.

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_VOLUME: f32 = 0.75;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("could not load audio source: {0}")]
    Load(String),

    #[error("playback was refused: {0}")]
    Refused(String),
}

pub trait AudioPlayback {
    fn load(&mut self, source: &str) -> Result<(), PlaybackError>;
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn seek(&mut self, position_secs: f64);
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
}

/// Notifications raised by the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    MetadataLoaded { duration_secs: f64 },
    TimeUpdate { position_secs: f64 },
    Ended,
}

pub struct AudioPlayer<P: AudioPlayback> {
    backend: P,
    playing: bool,
    muted: bool,
    volume: f32,
    position_secs: f64,
    duration_secs: f64,
}

impl<P: AudioPlayback> AudioPlayer<P> {
    pub fn new(mut backend: P, source: &str, autoplay: bool) -> Result<Self, PlaybackError> {
        backend.load(source)?;
        backend.set_volume(DEFAULT_VOLUME);

        let mut player = Self {
            backend,
            playing: false,
            muted: false,
            volume: DEFAULT_VOLUME,
            position_secs: 0.0,
            duration_secs: 0.0,
        };
        if autoplay {
            player.start();
        }
        Ok(player)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn toggle_play_pause(&mut self) {
        if self.playing {
            self.backend.pause();
            self.playing = false;
        } else {
            self.start();
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.backend.set_muted(self.muted);
    }

    /// Zero volume mutes; raising it again unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.volume = volume;
        self.backend.set_volume(volume);

        if volume == 0.0 {
            self.muted = true;
            self.backend.set_muted(true);
        } else if self.muted {
            self.muted = false;
            self.backend.set_muted(false);
        }
    }

    pub fn seek(&mut self, position_secs: f64) {
        let position = if self.duration_secs > 0.0 {
            position_secs.clamp(0.0, self.duration_secs)
        } else {
            position_secs.max(0.0)
        };
        self.position_secs = position;
        self.backend.seek(position);
    }

    pub fn handle(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::MetadataLoaded { duration_secs } => self.duration_secs = duration_secs,
            PlaybackEvent::TimeUpdate { position_secs } => self.position_secs = position_secs,
            PlaybackEvent::Ended => {
                self.playing = false;
                self.position_secs = 0.0;
            }
        }
    }

    /// `MM:SS / MM:SS` progress label.
    pub fn progress_label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.position_secs),
            format_time(self.duration_secs)
        )
    }

    fn start(&mut self) {
        match self.backend.play() {
            Ok(()) => self.playing = true,
            Err(e) => warn!(error = %e, "Play failed"),
        }
    }
}

pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "00:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeDevice {
        loaded: Option<String>,
        playing: bool,
        muted: bool,
        volume: f32,
        seeked_to: Option<f64>,
        refuse_play: bool,
    }

    impl AudioPlayback for FakeDevice {
        fn load(&mut self, source: &str) -> Result<(), PlaybackError> {
            if source.is_empty() {
                return Err(PlaybackError::Load("empty source".to_string()));
            }
            self.loaded = Some(source.to_string());
            Ok(())
        }

        fn play(&mut self) -> Result<(), PlaybackError> {
            if self.refuse_play {
                return Err(PlaybackError::Refused("autoplay blocked".to_string()));
            }
            self.playing = true;
            Ok(())
        }

        fn pause(&mut self) {
            self.playing = false;
        }

        fn seek(&mut self, position_secs: f64) {
            self.seeked_to = Some(position_secs);
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }

    const CLIP: &str = "data:audio/mpeg;base64,AAAA";

    #[test]
    fn test_defaults_after_load() {
        let player = AudioPlayer::new(FakeDevice::default(), CLIP, false).unwrap();
        assert!(!player.is_playing());
        assert!(!player.is_muted());
        assert_eq!(player.volume(), DEFAULT_VOLUME);
        assert_eq!(player.backend.volume, DEFAULT_VOLUME);
        assert_eq!(player.backend.loaded.as_deref(), Some(CLIP));
    }

    #[test]
    fn test_load_failure_is_reported() {
        assert!(AudioPlayer::new(FakeDevice::default(), "", true).is_err());
    }

    #[test]
    fn test_autoplay_and_toggle() {
        let mut player = AudioPlayer::new(FakeDevice::default(), CLIP, true).unwrap();
        assert!(player.is_playing());
        player.toggle_play_pause();
        assert!(!player.is_playing());
        assert!(!player.backend.playing);
        player.toggle_play_pause();
        assert!(player.is_playing());
    }

    #[test]
    fn test_refused_play_stays_paused() {
        let device = FakeDevice {
            refuse_play: true,
            ..FakeDevice::default()
        };
        let player = AudioPlayer::new(device, CLIP, true).unwrap();
        assert!(!player.is_playing());
    }

    #[test]
    fn test_ended_resets_position() {
        let mut player = AudioPlayer::new(FakeDevice::default(), CLIP, true).unwrap();
        player.handle(PlaybackEvent::MetadataLoaded { duration_secs: 65.4 });
        player.handle(PlaybackEvent::TimeUpdate { position_secs: 12.9 });
        assert_eq!(player.progress_label(), "00:12 / 01:05");

        player.handle(PlaybackEvent::Ended);
        assert!(!player.is_playing());
        assert_eq!(player.position_secs(), 0.0);
    }

    #[test]
    fn test_zero_volume_mutes_and_raising_unmutes() {
        let mut player = AudioPlayer::new(FakeDevice::default(), CLIP, false).unwrap();
        player.set_volume(0.0);
        assert!(player.is_muted());
        assert!(player.backend.muted);

        player.set_volume(0.4);
        assert!(!player.is_muted());
        assert_eq!(player.volume(), 0.4);

        player.toggle_mute();
        assert!(player.is_muted());
    }

    #[test]
    fn test_seek_is_clamped_to_duration() {
        let mut player = AudioPlayer::new(FakeDevice::default(), CLIP, false).unwrap();
        player.handle(PlaybackEvent::MetadataLoaded { duration_secs: 30.0 });
        player.seek(45.0);
        assert_eq!(player.position_secs(), 30.0);
        assert_eq!(player.backend.seeked_to, Some(30.0));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(125.7), "02:05");
    }
}
