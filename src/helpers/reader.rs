use crate::error::InspectorError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;

/// Byte source for an uploaded data file: a path on disk or an in-memory upload.
pub(crate) enum SourceReader {
    /// Local file reader
    Local(BufReader<File>),
    /// Uploaded bytes kept in memory for the session
    Memory(Cursor<Vec<u8>>),
}

impl SourceReader {
    /// Opens a local file for reading.
    pub(crate) fn open(file_name: &str) -> Result<SourceReader, InspectorError> {
        let file = File::open(file_name)?;
        Ok(SourceReader::Local(BufReader::new(file)))
    }

    /// Wraps bytes that were already received, e.g. from an upload widget.
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> SourceReader {
        SourceReader::Memory(Cursor::new(bytes))
    }
}

impl Read for SourceReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            SourceReader::Local(reader) => reader.read(buf),
            SourceReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for SourceReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            SourceReader::Local(reader) => reader.seek(pos),
            SourceReader::Memory(reader) => reader.seek(pos),
        }
    }
}
