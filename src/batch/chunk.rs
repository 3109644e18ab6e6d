// src/batch/chunk.rs
// =============================================================================
// Turns a URL file into a lazy stream of fixed-size chunks.
//
// Pipeline:
//   BufRead  --UrlLines-->  lines (with their '\n')  --Chunker-->  Chunk, Chunk, ...
//
// Both adapters are plain Iterators, so nothing is read from disk until the
// dispatcher asks for the next chunk. They are single-pass: once they return
// None they stay exhausted (we implement FusedIterator to promise that).
//
// Rust concepts:
// - Iterator trait: implementing next() gives us map/filter/etc for free
// - Generics: Chunker works with any iterator of io::Result<String>
// - FusedIterator: a marker trait meaning "None forever after the first None"
// =============================================================================

use std::io::{self, BufRead};
use std::iter::FusedIterator;

use crate::error::ValidationError;

/// One group of URL lines that is pushed in a single HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in the input (0-based)
    pub index: usize,
    /// The lines exactly as read, trailing newline included
    pub lines: Vec<String>,
}

impl Chunk {
    pub fn new(index: usize, lines: Vec<String>) -> Self {
        Self { index, lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The request body for batch pushes: lines joined with no separator.
    pub fn body(&self) -> String {
        self.lines.concat()
    }
}

// Reads raw lines from a file.
//
// We read bytes up to each '\n' and decode them lossily, so a stray
// non-UTF-8 byte turns into U+FFFD instead of aborting the whole run.
pub struct UrlLines<R> {
    reader: R,
    done: bool,
}

impl<R: BufRead> UrlLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for UrlLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(String::from_utf8_lossy(&buf).into_owned())),
            Err(e) => {
                // A read error ends the stream
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for UrlLines<R> {}

/// Groups lines into chunks of `size`, keeping input order.
///
/// Every chunk but the last has exactly `size` lines. If the underlying
/// iterator yields an error, that error is returned once and the chunker
/// is exhausted afterwards.
pub struct Chunker<I> {
    lines: I,
    size: usize,
    next_index: usize,
    done: bool,
}

impl<I> Chunker<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: I, size: usize) -> Result<Self, ValidationError> {
        if size == 0 {
            return Err(ValidationError::InvalidChunkSize);
        }
        Ok(Self {
            lines,
            size,
            next_index: 0,
            done: false,
        })
    }
}

impl<I> Iterator for Chunker<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut lines = Vec::with_capacity(self.size.min(64));
        while lines.len() < self.size {
            match self.lines.next() {
                Some(Ok(line)) => lines.push(line),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if lines.is_empty() {
            return None;
        }

        let chunk = Chunk::new(self.next_index, lines);
        self.next_index += 1;
        Some(Ok(chunk))
    }
}

impl<I> FusedIterator for Chunker<I> where I: Iterator<Item = io::Result<String>> {}

/// Drops lines that are blank after trimming (used by the beacon mode).
pub fn non_blank<I>(lines: I) -> impl Iterator<Item = io::Result<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    lines.filter(|line| match line {
        Ok(text) => !text.trim().is_empty(),
        Err(_) => true,
    })
}
