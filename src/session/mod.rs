//! # Inspection Session Module
//!
//! One inspector's working context: the loaded sheet, typed inputs and the
//! last result message ([`state`]), timestamped bookmarks ([`bookmark`]),
//! the two dash-cam videos ([`playback`]) and the prompt commands that drive
//! them ([`command`]).
pub mod bookmark;
pub mod command;
pub mod playback;
pub mod state;
