use linereader::LineReader;
use std::io::{self, Read};

pub const MAX_LINE: usize = 4096;
const BUFFER: usize = 64 * 1024;

/// Splits a stream into keys: one per line, trailing `\n` stripped, capped at
/// `max_line` bytes. Whatever is left of an overlong line is dropped, so it still
/// counts once.
pub struct Lines<R> {
    reader: LineReader<R>,
    max_line: usize,
    overflow: bool,
}

impl<R: Read> Lines<R> {
    pub fn new(inner: R, max_line: usize) -> Lines<R> {
        let max_line = max_line.max(1);
        Lines {
            reader: LineReader::with_capacity(BUFFER.max(max_line.saturating_add(1)), inner),
            max_line,
            overflow: false,
        }
    }

    pub fn next_key(&mut self) -> Option<io::Result<&[u8]>> {
        // linereader hands out lines longer than its buffer in pieces
        while self.overflow {
            match self.reader.next_line()? {
                Ok(rest) => self.overflow = !rest.ends_with(b"\n"),
                Err(e) => return Some(Err(e)),
            }
        }

        let line = match self.reader.next_line()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e)),
        };
        let key = match line.strip_suffix(b"\n") {
            Some(key) => key,
            None => {
                self.overflow = true;
                line
            }
        };
        Some(Ok(&key[..key.len().min(self.max_line)]))
    }
}
