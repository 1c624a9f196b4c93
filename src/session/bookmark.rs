use chrono::TimeDelta;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

/// Label stored when a bookmark is created without one.
pub const NO_LABEL: &str = "(no label)";

/// One of the two synchronized dash-cam videos.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VideoId {
    First,
    Second,
}

impl VideoId {
    pub fn number(&self) -> u8 {
        match self {
            VideoId::First => 1,
            VideoId::Second => 2,
        }
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for VideoId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(VideoId::First),
            "2" => Ok(VideoId::Second),
            other => Err(format!("unknown video '{other}', expected 1 or 2")),
        }
    }
}

/// A labelled position in one of the videos, with a free-form note.
#[derive(Clone, Debug, PartialEq)]
pub struct Bookmark {
    pub id: Uuid,
    pub video: VideoId,
    /// Playback position as `HH:MM:SS`
    pub time: String,
    pub label: String,
    pub note: String,
}

impl Display for Bookmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Video {} — {} — {}", self.video, self.time, self.label)
    }
}

/// Formats a playback position as zero-padded `HH:MM:SS`.
///
/// Fractions of a second are dropped and hours keep counting past 24.
/// Negative and NaN positions render as `00:00:00`.
pub fn format_timestamp(seconds: f64) -> String {
    let whole = seconds.max(0.0).floor() as i64;
    let delta = TimeDelta::try_seconds(whole).unwrap_or_else(TimeDelta::zero);
    format!(
        "{:02}:{:02}:{:02}",
        delta.num_hours(),
        delta.num_minutes() % 60,
        delta.num_seconds() % 60
    )
}

/// Bookmarks in creation order. Entries are only ever appended; notes are
/// the only mutable part.
#[derive(Clone, Debug, Default)]
pub struct Bookmarks {
    entries: Vec<Bookmark>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Bookmarks::default()
    }

    /// Appends a bookmark at `seconds` into `video`.
    ///
    /// Nothing is created for a zero (or unknown) position. A blank label is
    /// stored as [`NO_LABEL`].
    pub fn create(&mut self, video: VideoId, seconds: f64, label: &str) -> Option<&Bookmark> {
        if seconds.is_nan() || seconds == 0.0 {
            return None;
        }
        let label = if label.is_empty() { NO_LABEL } else { label };
        let bookmark = Bookmark {
            id: Uuid::new_v4(),
            video,
            time: format_timestamp(seconds),
            label: label.to_owned(),
            note: String::new(),
        };
        debug!(id = %bookmark.id, video = %video, time = %bookmark.time, "created bookmark");
        self.entries.push(bookmark);
        self.entries.last()
    }

    /// Replaces the note of the bookmark at `index`. Out-of-range indexes are ignored.
    pub fn update_note(&mut self, index: usize, note: &str) -> bool {
        match self.entries.get_mut(index) {
            Some(bookmark) => {
                bookmark.note = note.to_owned();
                true
            }
            None => false,
        }
    }

    /// Replaces the note of the bookmark with `id`. Unknown ids are ignored.
    pub fn update_note_by_id(&mut self, id: Uuid, note: &str) -> bool {
        match self.entries.iter_mut().find(|bookmark| bookmark.id == id) {
            Some(bookmark) => {
                bookmark.note = note.to_owned();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Bookmark> {
        self.entries.get(index)
    }

    pub fn as_slice(&self) -> &[Bookmark] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
