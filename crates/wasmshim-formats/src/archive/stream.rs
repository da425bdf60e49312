//! Incremental zlib inflater over an in-memory container
//!
//! Unlike `flate2::read::ZlibDecoder`, this reader distinguishes a stream
//! that reached its end marker from one that simply ran out of input, and
//! remembers how many compressed bytes follow the end marker.

use flate2::{Decompress, FlushDecompress, Status};
use std::io::{self, Read};

/// Streaming zlib reader over borrowed compressed bytes
pub struct InflateStream<'a> {
    input: &'a [u8],
    inflater: Decompress,
    finished: bool,
}

impl<'a> InflateStream<'a> {
    /// Start inflating `input` (zlib framing)
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            inflater: Decompress::new(true),
            finished: false,
        }
    }

    /// Whether the zlib end marker and checksum have been consumed
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Compressed bytes left over after the end marker
    pub fn trailing_input(&self) -> usize {
        if self.finished { self.input.len() } else { 0 }
    }

    /// Total decompressed bytes produced so far
    pub fn total_out(&self) -> u64 {
        self.inflater.total_out()
    }
}

impl Read for InflateStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if self.finished {
                return Ok(0);
            }

            let before_in = self.inflater.total_in();
            let before_out = self.inflater.total_out();
            let status = self
                .inflater
                .decompress(self.input, buf, FlushDecompress::None)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            let consumed = (self.inflater.total_in() - before_in) as usize;
            let produced = (self.inflater.total_out() - before_out) as usize;
            self.input = &self.input[consumed..];

            if status == Status::StreamEnd {
                self.finished = true;
            }
            if produced > 0 {
                return Ok(produced);
            }
            if self.finished {
                return Ok(0);
            }
            if self.input.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "compressed stream ended before its end marker",
                ));
            }
            if consumed == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "inflater made no progress",
                ));
            }
        }
    }
}
