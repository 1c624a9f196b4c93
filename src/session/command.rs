//! Line-oriented commands typed at the inspector prompt.
//!
//! Arguments are separated by whitespace; column names contain spaces and
//! must be double-quoted:
//!
//! ```text
//! count "L2 Rut Depth (in mm)" 5.1
//! ```
use crate::error::InspectorError;
use crate::helpers::number::parse_float_prefix;
use crate::session::bookmark::format_timestamp;
use crate::session::bookmark::VideoId;
use crate::session::playback::PlaybackState;
use crate::session::playback::Player;
use crate::session::state::Session;
use crate::spreadsheet::criteria::Criteria;
use regex::Regex;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("Hardcode regex pattern"));

pub const HELP: &str = "\
load FILE                 load a .csv or .xlsx survey sheet
frame [N]                 check frame N (or the last frame entered) against the thresholds
summary                   list columns with any frame at or above its threshold
count COLUMN [VALUE]      count frames at or above the column threshold, or VALUE
columns                   list the analysed columns and their thresholds
play                      play both videos, or pause both if either is playing
seek VIDEO SECONDS        move video 1 or 2 to a position
label TEXT                set the label for the next bookmark
bookmark VIDEO            bookmark the current position of video 1 or 2
note INDEX TEXT           set the note of bookmark INDEX (as listed by `bookmarks`)
bookmarks                 list bookmarks and notes
help                      show this help
quit                      leave";

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'. Type 'help' for the list of commands")]
    UnknownCommand(String),

    #[error("Command '{command}' requires {argument}")]
    MissingArgument { command: String, argument: String },

    #[error("Invalid {argument} '{value}'")]
    InvalidArgument { argument: String, value: String },

    #[error("Too many arguments for '{0}'")]
    TooManyArguments(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Load(PathBuf),
    Frame(Option<String>),
    Summary,
    Count { column: String, value: Option<String> },
    Columns,
    Play,
    Seek { video: VideoId, seconds: f64 },
    Label(String),
    Bookmark(VideoId),
    /// Bookmark position as listed, starting at 1
    Note { position: usize, text: String },
    Bookmarks,
    Help,
    Quit,
}

/// Splits a command line into arguments, honouring double quotes.
fn tokenize(line: &str) -> Vec<String> {
    TOKEN_PATTERN
        .captures_iter(line)
        .filter_map(|captures| captures.get(1).or_else(|| captures.get(2)))
        .map(|token| token.as_str().to_owned())
        .collect()
}

fn missing(command: &str, argument: &str) -> CommandError {
    CommandError::MissingArgument {
        command: command.to_owned(),
        argument: argument.to_owned(),
    }
}

fn invalid(argument: &str, value: &str) -> CommandError {
    CommandError::InvalidArgument {
        argument: argument.to_owned(),
        value: value.to_owned(),
    }
}

fn parse_video(value: Option<&String>, command: &str) -> Result<VideoId, CommandError> {
    let value = value.ok_or_else(|| missing(command, "a video number (1 or 2)"))?;
    value.parse::<VideoId>().map_err(|_| invalid("video", value))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(line);
        let (name, arguments) = tokens.split_first().ok_or(CommandError::Empty)?;
        let name = name.to_ascii_lowercase();
        let at_most = |count: usize| {
            if arguments.len() > count {
                Err(CommandError::TooManyArguments(name.clone()))
            } else {
                Ok(())
            }
        };
        let command = match name.as_str() {
            "load" => {
                at_most(1)?;
                let file = arguments.first().ok_or_else(|| missing(&name, "a file name"))?;
                Command::Load(PathBuf::from(file))
            }
            "frame" => {
                at_most(1)?;
                Command::Frame(arguments.first().cloned())
            }
            "summary" => {
                at_most(0)?;
                Command::Summary
            }
            "count" => {
                at_most(2)?;
                let column = arguments.first().ok_or_else(|| missing(&name, "a column name"))?;
                Command::Count {
                    column: column.clone(),
                    value: arguments.get(1).cloned(),
                }
            }
            "columns" => {
                at_most(0)?;
                Command::Columns
            }
            "play" | "pause" => {
                at_most(0)?;
                Command::Play
            }
            "seek" => {
                at_most(2)?;
                let video = parse_video(arguments.first(), &name)?;
                let seconds = arguments.get(1).ok_or_else(|| missing(&name, "a position in seconds"))?;
                let seconds = parse_float_prefix(seconds)
                    .filter(|seconds| seconds.is_finite())
                    .ok_or_else(|| invalid("position", seconds))?;
                Command::Seek { video, seconds }
            }
            "label" => Command::Label(arguments.join(" ")),
            "bookmark" => {
                at_most(1)?;
                Command::Bookmark(parse_video(arguments.first(), &name)?)
            }
            "note" => {
                let (position, text) = arguments
                    .split_first()
                    .ok_or_else(|| missing(&name, "a bookmark number"))?;
                let position = position.parse::<usize>().map_err(|_| invalid("bookmark number", position))?;
                Command::Note {
                    position,
                    text: text.join(" "),
                }
            }
            "bookmarks" => {
                at_most(0)?;
                Command::Bookmarks
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::UnknownCommand(name.clone())),
        };
        Ok(command)
    }
}

/// What the prompt should do after a command.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Text(String),
    Quit,
}

impl<P: Player> Session<P> {
    /// Parses and runs one prompt line.
    pub fn execute_line(&mut self, line: &str) -> Result<Reply, InspectorError> {
        let command = line.parse::<Command>()?;
        self.execute(command)
    }

    /// Runs a command against the session. Only loading can fail; every
    /// other outcome is reported as text.
    pub fn execute(&mut self, command: Command) -> Result<Reply, InspectorError> {
        let text = match command {
            Command::Load(path) => {
                let file_name = path.to_string_lossy();
                let rows = self.load_file(&file_name)?;
                format!("Loaded {} rows from '{}'", rows, file_name)
            }
            Command::Frame(input) => {
                if let Some(input) = input {
                    self.set_frame_input(&input);
                }
                self.check_frame().to_owned()
            }
            Command::Summary => self.show_exceeding_columns().to_owned(),
            Command::Count { column, value } => self.count_exceeding(&column, value.as_deref()).to_owned(),
            Command::Columns => self.columns_listing(),
            Command::Play => match self.toggle_play_pause() {
                PlaybackState::Playing => "Playing both videos.".to_owned(),
                PlaybackState::Paused => "Paused both videos.".to_owned(),
                PlaybackState::NoVideo => "No video loaded.".to_owned(),
            },
            Command::Seek { video, seconds } => {
                if self.seek(video, seconds) {
                    format!("Video {} at {}", video, format_timestamp(seconds))
                } else {
                    format!("Video {} is not loaded.", video)
                }
            }
            Command::Label(label) => {
                self.set_bookmark_label(&label);
                format!("Bookmark label: {}", if label.is_empty() { "(none)" } else { label.as_str() })
            }
            Command::Bookmark(video) => match self.bookmark(video) {
                Some(bookmark) => format!("Bookmarked {}", bookmark),
                None => format!("Nothing to bookmark on video {}.", video),
            },
            Command::Note { position, text } => {
                let updated = position
                    .checked_sub(1)
                    .is_some_and(|index| self.update_note(index, &text));
                if updated {
                    format!("Note saved on bookmark {}.", position)
                } else {
                    format!("No bookmark {}.", position)
                }
            }
            Command::Bookmarks => self.bookmarks_listing(),
            Command::Help => HELP.to_owned(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }

    fn columns_listing(&self) -> String {
        self.thresholds()
            .entries()
            .map(|(column, threshold)| format!("{}: {}", column, threshold))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn bookmarks_listing(&self) -> String {
        if self.bookmarks().is_empty() {
            return "No bookmarks.".to_owned();
        }
        self.bookmarks()
            .iter()
            .enumerate()
            .map(|(index, bookmark)| {
                if bookmark.note.is_empty() {
                    format!("{}. {}", index + 1, bookmark)
                } else {
                    format!("{}. {}\n   {}", index + 1, bookmark, bookmark.note)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Builds read criteria from command-line style options.
pub fn criteria_from_options(delimiter: char, keep_empty_rows: bool, encoding: &str) -> Result<Criteria, CommandError> {
    let delimiter = u8::try_from(delimiter).map_err(|_| invalid("delimiter", &delimiter.to_string()))?;
    let encoding = encoding.parse().map_err(|_| invalid("encoding", encoding))?;
    Ok(Criteria {
        delimiter,
        skip_empty_rows: !keep_empty_rows,
        encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::playback::ClockPlayer;
    use crate::spreadsheet::criteria::TextEncoding;

    #[test]
    fn tokenize_quoted_arguments() {
        assert_eq!(
            tokenize(r#"count "L2 Rut Depth (in mm)"  5.1"#),
            vec!["count", "L2 Rut Depth (in mm)", "5.1"]
        );
        assert_eq!(tokenize("   "), Vec::<String>::new());
        assert_eq!(tokenize(r#"label """#), vec!["label", ""]);
    }

    #[test]
    fn parse_commands() {
        assert_eq!("FRAME 12".parse::<Command>(), Ok(Command::Frame(Some("12".to_owned()))));
        assert_eq!("frame".parse::<Command>(), Ok(Command::Frame(None)));
        assert_eq!(
            r#"count "L2 Rut Depth (in mm)""#.parse::<Command>(),
            Ok(Command::Count { column: "L2 Rut Depth (in mm)".to_owned(), value: None })
        );
        assert_eq!("seek 2 90.5".parse::<Command>(), Ok(Command::Seek { video: VideoId::Second, seconds: 90.5 }));
        assert_eq!("label edge crack".parse::<Command>(), Ok(Command::Label("edge crack".to_owned())));
        assert_eq!(
            "note 1 patched last week".parse::<Command>(),
            Ok(Command::Note { position: 1, text: "patched last week".to_owned() })
        );
        assert_eq!("bookmark 1".parse::<Command>(), Ok(Command::Bookmark(VideoId::First)));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("jump".parse::<Command>(), Err(CommandError::UnknownCommand("jump".to_owned())));
        assert!(matches!("load".parse::<Command>(), Err(CommandError::MissingArgument { .. })));
        assert!(matches!("bookmark 3".parse::<Command>(), Err(CommandError::InvalidArgument { .. })));
        assert!(matches!("seek 1 soon".parse::<Command>(), Err(CommandError::InvalidArgument { .. })));
        assert!(matches!("note first hi".parse::<Command>(), Err(CommandError::InvalidArgument { .. })));
        assert_eq!("summary now".parse::<Command>(), Err(CommandError::TooManyArguments("summary".to_owned())));
    }

    #[test]
    fn execute_commands() {
        let mut session: Session<ClockPlayer> = Session::new(Criteria::default());
        session
            .load_bytes("survey.csv", b"title\nChainage,L2 Rut Depth (in mm)\n0,6\n10,1\n".to_vec())
            .unwrap();

        assert_eq!(
            session.execute_line("frame 0").unwrap(),
            Reply::Text("Frame 0 — Violations found:\nL2 Rut Depth (in mm): 6 ≥ 5.1".to_owned())
        );
        assert_eq!(
            session.execute_line("frame").unwrap(),
            Reply::Text("Frame 0 — Violations found:\nL2 Rut Depth (in mm): 6 ≥ 5.1".to_owned())
        );
        assert_eq!(
            session.execute_line(r#"count "L2 Rut Depth (in mm)" 1"#).unwrap(),
            Reply::Text("Cells >= 1: 2".to_owned())
        );
        assert_eq!(session.execute_line("play").unwrap(), Reply::Text("No video loaded.".to_owned()));
        assert_eq!(session.execute_line("bookmarks").unwrap(), Reply::Text("No bookmarks.".to_owned()));
        assert_eq!(session.execute_line("quit").unwrap(), Reply::Quit);
        assert!(session.execute_line("nonsense").is_err());
    }

    #[test]
    fn bookmark_commands() {
        let mut session: Session<ClockPlayer> = Session::new(Criteria::default());
        session.attach_video(VideoId::First, ClockPlayer::new("left.mp4"));

        assert_eq!(
            session.execute_line("bookmark 1").unwrap(),
            Reply::Text("Nothing to bookmark on video 1.".to_owned())
        );
        assert_eq!(session.execute_line("seek 1 3661").unwrap(), Reply::Text("Video 1 at 01:01:01".to_owned()));
        session.execute_line("label rut").unwrap();
        assert_eq!(
            session.execute_line("bookmark 1").unwrap(),
            Reply::Text("Bookmarked Video 1 — 01:01:01 — rut".to_owned())
        );
        assert_eq!(session.execute_line("note 1 deep").unwrap(), Reply::Text("Note saved on bookmark 1.".to_owned()));
        assert_eq!(session.execute_line("note 0 none").unwrap(), Reply::Text("No bookmark 0.".to_owned()));
        assert_eq!(
            session.execute_line("bookmarks").unwrap(),
            Reply::Text("1. Video 1 — 01:01:01 — rut\n   deep".to_owned())
        );
        assert_eq!(session.execute_line("seek 2 5").unwrap(), Reply::Text("Video 2 is not loaded.".to_owned()));
    }

    #[test]
    fn columns_listing_shows_undefined_limits() {
        let mut session: Session<ClockPlayer> = Session::new(Criteria::default());
        let Reply::Text(listing) = session.execute_line("columns").unwrap() else {
            panic!("expected text");
        };
        assert_eq!(listing.lines().count(), 32);
        assert!(listing.starts_with("L1 Lane Roughness BI (in mm/km): 2440\n"));
        assert!(listing.ends_with("R4 Area (% area): null"));
    }

    #[test]
    fn criteria_options() {
        let criteria = criteria_from_options(';', true, "windows-1252").unwrap();
        assert_eq!(criteria.delimiter, b';');
        assert!(!criteria.skip_empty_rows);
        assert_eq!(criteria.encoding, TextEncoding::Windows1252);
        assert!(criteria_from_options('→', false, "auto").is_err());
        assert!(criteria_from_options(',', false, "latin9").is_err());
    }
}
