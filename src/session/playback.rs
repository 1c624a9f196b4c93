use crate::session::bookmark::VideoId;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// A video that can be played, paused and positioned.
pub trait Player {
    fn is_playing(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    fn seek(&mut self, seconds: f64);
}

/// Keeps a playback position against the wall clock for a local media file.
/// Nothing is decoded; the position advances while playing.
#[derive(Debug)]
pub struct ClockPlayer {
    source: PathBuf,
    position: f64,
    started: Option<Instant>,
}

impl ClockPlayer {
    pub fn new(source: impl AsRef<Path>) -> Self {
        ClockPlayer {
            source: source.as_ref().to_path_buf(),
            position: 0.0,
            started: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl Player for ClockPlayer {
    fn is_playing(&self) -> bool {
        self.started.is_some()
    }

    fn play(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(started) = self.started.take() {
            self.position += started.elapsed().as_secs_f64();
        }
    }

    fn current_time(&self) -> f64 {
        self.position + self.started.map_or(0.0, |started| started.elapsed().as_secs_f64())
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds.max(0.0);
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    /// Neither video is loaded
    NoVideo,
}

/// Drives the two videos together. Synchronization is best effort: both
/// receive the same command, their positions are not aligned.
#[derive(Debug)]
pub struct PlaybackCoordinator<P: Player> {
    first: Option<P>,
    second: Option<P>,
}

impl<P: Player> Default for PlaybackCoordinator<P> {
    fn default() -> Self {
        PlaybackCoordinator {
            first: None,
            second: None,
        }
    }
}

impl<P: Player> PlaybackCoordinator<P> {
    pub fn new() -> Self {
        PlaybackCoordinator::default()
    }

    /// Loads `player` as `video`, replacing whatever was there.
    pub fn attach(&mut self, video: VideoId, player: P) {
        debug!(video = %video, "attached video");
        *self.slot_mut(video) = Some(player);
    }

    pub fn player(&self, video: VideoId) -> Option<&P> {
        match video {
            VideoId::First => self.first.as_ref(),
            VideoId::Second => self.second.as_ref(),
        }
    }

    fn slot_mut(&mut self, video: VideoId) -> &mut Option<P> {
        match video {
            VideoId::First => &mut self.first,
            VideoId::Second => &mut self.second,
        }
    }

    fn players_mut(&mut self) -> impl Iterator<Item = &mut P> {
        self.first.iter_mut().chain(self.second.iter_mut())
    }

    /// Pauses both videos if either is playing, otherwise plays both.
    pub fn toggle_play_pause(&mut self) -> PlaybackState {
        if self.first.is_none() && self.second.is_none() {
            return PlaybackState::NoVideo;
        }
        let any_playing = self.players_mut().any(|player| player.is_playing());
        let state = if any_playing {
            self.players_mut().for_each(|player| player.pause());
            PlaybackState::Paused
        } else {
            self.players_mut().for_each(|player| player.play());
            PlaybackState::Playing
        };
        debug!(?state, "toggled playback");
        state
    }

    /// Position of `video`, or `None` if it is not loaded.
    pub fn current_time(&self, video: VideoId) -> Option<f64> {
        self.player(video).map(Player::current_time)
    }

    /// Moves `video` to `seconds`. Returns false if it is not loaded.
    pub fn seek(&mut self, video: VideoId, seconds: f64) -> bool {
        match self.slot_mut(video) {
            Some(player) => {
                player.seek(seconds);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_clock_keeps_position() {
        let mut player = ClockPlayer::new("dashcam-left.mp4");
        assert!(!player.is_playing());
        assert_eq!(player.current_time(), 0.0);
        player.seek(42.5);
        assert_eq!(player.current_time(), 42.5);
        player.seek(-3.0);
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(player.source(), Path::new("dashcam-left.mp4"));
    }

    #[test]
    fn playing_clock_advances() {
        let mut player = ClockPlayer::new("dashcam-left.mp4");
        player.seek(10.0);
        player.play();
        assert!(player.is_playing());
        assert!(player.current_time() >= 10.0);
        player.pause();
        let paused_at = player.current_time();
        assert!(paused_at >= 10.0);
        assert_eq!(player.current_time(), paused_at);
    }

    #[test]
    fn toggle_without_videos() {
        let mut coordinator: PlaybackCoordinator<ClockPlayer> = PlaybackCoordinator::new();
        assert_eq!(coordinator.toggle_play_pause(), PlaybackState::NoVideo);
        assert_eq!(coordinator.current_time(VideoId::First), None);
        assert!(!coordinator.seek(VideoId::Second, 1.0));
    }

    #[test]
    fn toggle_pauses_both_when_either_plays() {
        let mut coordinator = PlaybackCoordinator::new();
        coordinator.attach(VideoId::First, ClockPlayer::new("left.mp4"));
        coordinator.attach(VideoId::Second, ClockPlayer::new("right.mp4"));

        assert_eq!(coordinator.toggle_play_pause(), PlaybackState::Playing);
        assert!(coordinator.player(VideoId::First).is_some_and(Player::is_playing));
        assert!(coordinator.player(VideoId::Second).is_some_and(Player::is_playing));

        if let Some(second) = coordinator.slot_mut(VideoId::Second) {
            second.pause();
        }
        assert_eq!(coordinator.toggle_play_pause(), PlaybackState::Paused);
        assert!(!coordinator.player(VideoId::First).is_some_and(Player::is_playing));
        assert!(!coordinator.player(VideoId::Second).is_some_and(Player::is_playing));
    }

    #[test]
    fn single_video() {
        let mut coordinator = PlaybackCoordinator::new();
        coordinator.attach(VideoId::Second, ClockPlayer::new("right.mp4"));
        assert!(coordinator.seek(VideoId::Second, 7.0));
        assert_eq!(coordinator.current_time(VideoId::Second), Some(7.0));
        assert_eq!(coordinator.toggle_play_pause(), PlaybackState::Playing);
        assert_eq!(coordinator.toggle_play_pause(), PlaybackState::Paused);
    }
}
