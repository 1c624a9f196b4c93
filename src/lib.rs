//! # Road Inspector
//!
//! Cross-checks road-condition survey measurements against fixed regulatory
//! thresholds, frame by frame, next to two dash-cam videos.
//!
//! ## Features
//!
//! - **Survey sheets**: load `.csv` or `.xlsx` files (first worksheet) into
//!   an in-memory grid of raw cells
//! - **Frame checks**: list every lane measurement at or above its limit on
//!   a given frame
//! - **Column analysis**: find the columns that exceed their limit anywhere,
//!   and count frames at or above a limit or a chosen value
//! - **Bookmarks**: mark positions in either video with a label and a note
//! - **Synchronized playback**: play or pause both videos together
//!
//! ## Sheet layout
//!
//! Row 0 is a title row and is ignored, row 1 holds the column names, and
//! frame `N` is physical row `N + 2`.
//!
//! ```no_run
//! use road_inspector::Criteria;
//! use road_inspector::Session;
//!
//! let mut session: Session = Session::new(Criteria::default());
//! session.load_file("survey.xlsx")?;
//! session.set_frame_input("12");
//! println!("{}", session.check_frame());
//! # Ok::<(), road_inspector::InspectorError>(())
//! ```
pub mod analysis;
pub mod error;
mod helpers;
pub mod session;
pub mod spreadsheet;

pub use crate::analysis::thresholds::ThresholdTable;
pub use crate::error::InspectorError;
pub use crate::session::bookmark::VideoId;
pub use crate::session::command::Command;
pub use crate::session::command::Reply;
pub use crate::session::playback::ClockPlayer;
pub use crate::session::state::Session;
pub use crate::spreadsheet::cell::CellValue;
pub use crate::spreadsheet::criteria::Criteria;
pub use crate::spreadsheet::criteria::TextEncoding;
