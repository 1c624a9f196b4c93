use crate::analysis::evaluator::Evaluator;
use crate::analysis::store::RowStore;
use crate::analysis::thresholds::ThresholdTable;
use crate::analysis::EvaluationError;
use crate::error::InspectorError;
use crate::session::bookmark::Bookmark;
use crate::session::bookmark::Bookmarks;
use crate::session::bookmark::VideoId;
use crate::session::playback::ClockPlayer;
use crate::session::playback::PlaybackCoordinator;
use crate::session::playback::PlaybackState;
use crate::session::playback::Player;
use crate::spreadsheet;
use crate::spreadsheet::criteria::Criteria;
use tracing::warn;
use uuid::Uuid;

/// Where the current message is shown on the dashboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Panel {
    /// Result of a frame check
    Frame,
    /// Column summaries and counts
    Analysis,
}

/// Everything one inspector works with: the loaded sheet, the typed inputs,
/// the last result message, bookmarks and the two videos.
///
/// Evaluator failures never escape; they become the message. Only loading
/// a data file reports errors to the caller.
pub struct Session<P: Player = ClockPlayer> {
    thresholds: &'static ThresholdTable,
    store: RowStore,
    criteria: Criteria,
    frame_input: String,
    bookmark_label: String,
    message: String,
    bookmarks: Bookmarks,
    playback: PlaybackCoordinator<P>,
}

impl<P: Player> Session<P> {
    pub fn new(criteria: Criteria) -> Self {
        Session {
            thresholds: ThresholdTable::road_condition(),
            store: RowStore::default(),
            criteria,
            frame_input: String::new(),
            bookmark_label: String::new(),
            message: String::new(),
            bookmarks: Bookmarks::new(),
            playback: PlaybackCoordinator::new(),
        }
    }

    pub fn thresholds(&self) -> &'static ThresholdTable {
        self.thresholds
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Loads a data file from disk. On failure the previous sheet stays loaded.
    pub fn load_file(&mut self, file_name: &str) -> Result<usize, InspectorError> {
        let rows = spreadsheet::read_file(file_name, &self.criteria)?;
        self.store.load(rows);
        Ok(self.store.len())
    }

    /// Loads uploaded file contents. On failure the previous sheet stays loaded.
    pub fn load_bytes(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<usize, InspectorError> {
        let rows = spreadsheet::read_bytes(file_name, bytes, &self.criteria)?;
        self.store.load(rows);
        Ok(self.store.len())
    }

    pub fn frame_input(&self) -> &str {
        &self.frame_input
    }

    pub fn set_frame_input(&mut self, input: &str) {
        self.frame_input = input.to_owned();
    }

    /// Checks the frame currently typed in and records the outcome.
    pub fn check_frame(&mut self) -> &str {
        let evaluator = Evaluator::new(self.thresholds, &self.store);
        self.message = match evaluator.check_frame(&self.frame_input) {
            Ok(report) => report.to_string(),
            Err(EvaluationError::DataUnavailable) => "Invalid frame or no data loaded.".to_owned(),
            Err(EvaluationError::InvalidInput(_)) => "Enter a valid number.".to_owned(),
            Err(error) => error_message(&error),
        };
        &self.message
    }

    /// Lists the columns with at least one frame over the limit.
    pub fn show_exceeding_columns(&mut self) -> &str {
        let evaluator = Evaluator::new(self.thresholds, &self.store);
        self.message = match evaluator.exceeding_columns_summary() {
            Ok(columns) if columns.is_empty() => "No columns with cells exceeding thresholds.".to_owned(),
            Ok(columns) => columns.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"),
            Err(error) => error_message(&error),
        };
        &self.message
    }

    /// Counts the frames of `column` at or above its limit, or at or above
    /// `comparison_value` when one is given.
    pub fn count_exceeding(&mut self, column: &str, comparison_value: Option<&str>) -> &str {
        let evaluator = Evaluator::new(self.thresholds, &self.store);
        self.message = match evaluator.count_exceeding(column, comparison_value) {
            Ok(count) => count.to_string(),
            Err(error) => error_message(&error),
        };
        &self.message
    }

    /// The last result message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn panel(&self) -> Panel {
        if self.message.starts_with("Frame") {
            Panel::Frame
        } else {
            Panel::Analysis
        }
    }

    pub fn bookmark_label(&self) -> &str {
        &self.bookmark_label
    }

    pub fn set_bookmark_label(&mut self, label: &str) {
        self.bookmark_label = label.to_owned();
    }

    pub fn attach_video(&mut self, video: VideoId, player: P) {
        self.playback.attach(video, player);
    }

    pub fn playback(&self) -> &PlaybackCoordinator<P> {
        &self.playback
    }

    pub fn toggle_play_pause(&mut self) -> PlaybackState {
        self.playback.toggle_play_pause()
    }

    pub fn seek(&mut self, video: VideoId, seconds: f64) -> bool {
        self.playback.seek(video, seconds)
    }

    /// Bookmarks the current position of `video` with the typed label, then
    /// clears the label. Nothing happens if the video is not loaded or is
    /// still at the start.
    pub fn bookmark(&mut self, video: VideoId) -> Option<&Bookmark> {
        let Some(seconds) = self.playback.current_time(video) else {
            warn!(video = %video, "bookmark requested for a video that is not loaded");
            return None;
        };
        let label = std::mem::take(&mut self.bookmark_label);
        let created = self.bookmarks.create(video, seconds, &label).is_some();
        if !created {
            self.bookmark_label = label;
            return None;
        }
        self.bookmarks.as_slice().last()
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        self.bookmarks.as_slice()
    }

    /// Replaces the note of the bookmark at `index`; out of range is a no-op.
    pub fn update_note(&mut self, index: usize, note: &str) -> bool {
        self.bookmarks.update_note(index, note)
    }

    pub fn update_note_by_id(&mut self, id: Uuid, note: &str) -> bool {
        self.bookmarks.update_note_by_id(id, note)
    }
}

/// Dashboard text for an evaluation failure.
fn error_message(error: &EvaluationError) -> String {
    match error {
        EvaluationError::InvalidInput(_) => "Invalid number.",
        EvaluationError::DataUnavailable => "No data loaded.",
        EvaluationError::OutOfRange(_) => "Frame out of range.",
        EvaluationError::InvalidColumn(_) => "Column not in analysis list.",
        EvaluationError::ColumnNotFound(_) => "Column not found in sheet.",
        EvaluationError::NoThresholdDefined(_) => "No threshold defined for this column.",
    }
    .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
NH-48 survey,,
Chainage,L1 Lane Roughness BI (in mm/km),L2 Rut Depth (in mm)
0,2450,5.1
10,2439,5.0
20,1200,6.0
30,1100,n/a
";

    fn loaded() -> Session {
        let mut session = Session::new(Criteria::default());
        session.load_bytes("survey.csv", CSV.as_bytes().to_vec()).unwrap();
        session
    }

    #[test]
    fn frame_messages() {
        let mut session = loaded();
        session.set_frame_input("0");
        assert_eq!(
            session.check_frame(),
            "Frame 0 — Violations found:\nL1 Lane Roughness BI (in mm/km): 2450 ≥ 2440\nL2 Rut Depth (in mm): 5.1 ≥ 5.1"
        );
        assert_eq!(session.panel(), Panel::Frame);

        session.set_frame_input("1");
        assert_eq!(session.check_frame(), "Frame 1 — No threshold violations.");

        session.set_frame_input("9");
        assert_eq!(session.check_frame(), "Frame out of range.");
        assert_eq!(session.panel(), Panel::Frame);

        session.set_frame_input("99999999999999999999");
        assert_eq!(session.check_frame(), "Frame out of range.");

        session.set_frame_input("x");
        assert_eq!(session.check_frame(), "Enter a valid number.");
        assert_eq!(session.frame_input(), "x");
        assert_eq!(session.panel(), Panel::Analysis);

        session.set_frame_input("");
        assert_eq!(session.check_frame(), "Invalid frame or no data loaded.");
        assert_eq!(session.panel(), Panel::Analysis);

        session.set_frame_input("1");
        session.check_frame();
        session.show_exceeding_columns();
        assert_eq!(session.panel(), Panel::Analysis);
    }

    #[test]
    fn frame_without_data() {
        let mut session: Session = Session::new(Criteria::default());
        session.set_frame_input("0");
        assert_eq!(session.check_frame(), "Invalid frame or no data loaded.");
        assert_eq!(session.show_exceeding_columns(), "No data loaded.");
        assert_eq!(session.count_exceeding("L2 Rut Depth (in mm)", None), "No data loaded.");
    }

    #[test]
    fn analysis_messages() {
        let mut session = loaded();
        assert_eq!(
            session.show_exceeding_columns(),
            "L1 Lane Roughness BI (in mm/km): 2440\nL2 Rut Depth (in mm): 5.1"
        );
        assert_eq!(
            session.count_exceeding("L2 Rut Depth (in mm)", None),
            "Cells >= threshold (5.1): 2"
        );
        assert_eq!(session.count_exceeding("L2 Rut Depth (in mm)", Some("5")), "Cells >= 5: 3");
        assert_eq!(session.count_exceeding("L2 Rut Depth (in mm)", Some("abc")), "Invalid number.");
        assert_eq!(session.count_exceeding("Chainage", None), "Column not in analysis list.");
        assert_eq!(session.count_exceeding("R2 Rut Depth (in mm)", None), "Column not found in sheet.");
        assert_eq!(session.panel(), Panel::Analysis);
    }

    #[test]
    fn summary_when_nothing_exceeds() {
        let mut session: Session = Session::new(Criteria::default());
        session
            .load_bytes("calm.csv", b"title\nL1 Lane Roughness BI (in mm/km)\n100\n".to_vec())
            .unwrap();
        assert_eq!(session.show_exceeding_columns(), "No columns with cells exceeding thresholds.");
    }

    #[test]
    fn blank_records_keep_frame_numbers() {
        let mut session: Session = Session::new(Criteria::default());
        assert!(session.criteria().skip_empty_rows);
        session
            .load_bytes("gaps.csv", b"t,\nL2 Rut Depth (in mm),x\n1,a\n,\n9,b\n".to_vec())
            .unwrap();
        assert_eq!(session.store().len(), 5);

        session.set_frame_input("1");
        assert_eq!(session.check_frame(), "Frame 1 — No threshold violations.");
        session.set_frame_input("2");
        assert_eq!(session.check_frame(), "Frame 2 — Violations found:\nL2 Rut Depth (in mm): 9 ≥ 5.1");
    }

    #[test]
    fn failed_load_keeps_previous_sheet() {
        let mut session = loaded();
        assert!(session.load_bytes("survey.pdf", vec![1, 2, 3]).is_err());
        assert!(session.load_bytes("broken.xlsx", b"not a zip".to_vec()).is_err());
        assert_eq!(session.store().len(), 6);
    }

    #[test]
    fn bookmarks_follow_the_video() {
        let mut session: Session = Session::new(Criteria::default());
        session.set_bookmark_label("crack");
        assert!(session.bookmark(VideoId::First).is_none());
        assert_eq!(session.bookmark_label(), "crack");

        assert!(session.playback().player(VideoId::First).is_none());
        session.attach_video(VideoId::First, ClockPlayer::new("left.mp4"));
        assert!(session.playback().player(VideoId::First).is_some());
        assert!(session.bookmark(VideoId::First).is_none());
        assert_eq!(session.bookmark_label(), "crack");

        assert!(session.seek(VideoId::First, 95.0));
        let bookmark = session.bookmark(VideoId::First).cloned().unwrap();
        assert_eq!(bookmark.time, "00:01:35");
        assert_eq!(bookmark.label, "crack");
        assert_eq!(session.bookmark_label(), "");

        let unlabelled = session.bookmark(VideoId::First).cloned().unwrap();
        assert_eq!(unlabelled.label, "(no label)");

        assert!(session.update_note(0, "left shoulder"));
        assert!(!session.update_note(2, "nothing here"));
        assert!(session.update_note_by_id(unlabelled.id, "second"));
        assert_eq!(session.bookmarks()[0].note, "left shoulder");
        assert_eq!(session.bookmarks()[1].note, "second");
    }
}
