//! Length-prefixed record frames.
//!
//! Stream layout:
//!
//! ```text
//! [u32 LE len][JSON header]
//! [u32 LE len][JSON array of <= chunk_size records]   (repeated)
//! [u32 LE 0]                                          terminator
//! ```
//!
//! A JSON document is never empty, so a zero length is unambiguous.

use std::io::{ErrorKind, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StorageError;

/// Default number of records per chunk frame
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Largest frame a reader accepts (256 MiB)
pub const MAX_FRAME_LEN: u32 = 256 * 1024 * 1024;

/// Writes a header frame, chunk frames and the terminator
pub struct RecordWriter<W: Write> {
    writer: W,
    chunk_size: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Writer with the default chunk size
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the number of records per chunk frame (at least one)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Write one frame
    pub fn write_frame<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), StorageError> {
        let payload = serde_json::to_vec(value)?;
        let len = u32::try_from(payload.len())
            .ok()
            .filter(|len| *len <= MAX_FRAME_LEN)
            .ok_or(StorageError::FrameTooLarge {
                len: payload.len() as u64,
                max: u64::from(MAX_FRAME_LEN),
            })?;
        self.writer.write_u32::<LittleEndian>(len)?;
        self.writer.write_all(&payload)?;
        Ok(())
    }

    /// Write `records` as chunk frames
    pub fn write_records<T: Serialize>(&mut self, records: &[T]) -> Result<(), StorageError> {
        for chunk in records.chunks(self.chunk_size) {
            self.write_frame(chunk)?;
        }
        Ok(())
    }

    /// Write the terminator and return the inner writer
    pub fn finish(mut self) -> Result<W, StorageError> {
        self.writer.write_u32::<LittleEndian>(0)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Reads frames written by [`RecordWriter`]
pub struct RecordReader<R: Read> {
    reader: R,
    finished: bool,
}

impl<R: Read> RecordReader<R> {
    /// Reader over a frame stream
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            finished: false,
        }
    }

    /// Next frame, `None` once the terminator was read
    pub fn read_frame<T: DeserializeOwned>(&mut self) -> Result<Option<T>, StorageError> {
        if self.finished {
            return Ok(None);
        }
        let len = match self.reader.read_u32::<LittleEndian>() {
            Ok(len) => len,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(StorageError::Truncated),
            Err(e) => return Err(e.into()),
        };
        if len == 0 {
            self.finished = true;
            return Ok(None);
        }
        if len > MAX_FRAME_LEN {
            return Err(StorageError::FrameTooLarge {
                len: u64::from(len),
                max: u64::from(MAX_FRAME_LEN),
            });
        }
        let mut payload = Vec::new();
        (&mut self.reader)
            .take(u64::from(len))
            .read_to_end(&mut payload)?;
        if payload.len() != len as usize {
            return Err(StorageError::Truncated);
        }
        Ok(Some(serde_json::from_slice(&payload)?))
    }

    /// The header frame; a stream without one is truncated
    pub fn read_header<T: DeserializeOwned>(&mut self) -> Result<T, StorageError> {
        self.read_frame()?.ok_or(StorageError::Truncated)
    }

    /// All remaining chunk frames, concatenated
    pub fn read_records<T: DeserializeOwned>(&mut self) -> Result<Vec<T>, StorageError> {
        let mut records = Vec::new();
        while let Some(chunk) = self.read_frame::<Vec<T>>()? {
            records.extend(chunk);
        }
        Ok(records)
    }
}
