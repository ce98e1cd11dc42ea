//! Archive inputs that know how to step over an entry body.

use std::fs::File;
use std::io::{Cursor, Read, Result, Seek, SeekFrom};

use crate::transfer::{self, BUFFER_SIZE};

/// A readable archive stream that can move forward without handing the
/// skipped bytes to the caller.
pub trait Source: Read {
    /// Advance by up to `count` bytes. Returns how far the stream actually
    /// moved, which is short only when it ended first.
    fn skip(&mut self, count: u64) -> Result<u64>;
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn skip(&mut self, count: u64) -> Result<u64> {
        (**self).skip(count)
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn skip(&mut self, count: u64) -> Result<u64> {
        (**self).skip(count)
    }
}

#[inline(always)]
fn seek_within<S: Seek>(stream: &mut S, len: u64, count: u64) -> Result<u64> {
    let pos = stream.stream_position()?;
    let step = count.min(len.saturating_sub(pos));
    stream.seek(SeekFrom::Current(step as i64))?;
    Ok(step)
}

impl Source for File {
    /// Regular files seek; pipes, FIFOs and devices opened by path are read
    /// through and dropped.
    fn skip(&mut self, count: u64) -> Result<u64> {
        let meta = self.metadata()?;
        if meta.is_file() {
            seek_within(self, meta.len(), count)
        } else {
            let mut buf = vec![0u8; BUFFER_SIZE.min(count as usize)];
            transfer::discard(self, count, &mut buf)
        }
    }
}

impl<T: AsRef<[u8]>> Source for Cursor<T> {
    fn skip(&mut self, count: u64) -> Result<u64> {
        let len = self.get_ref().as_ref().len() as u64;
        seek_within(self, len, count)
    }
}

/// Wraps a stream that cannot seek, such as standard input, and skips by
/// reading into a scratch buffer.
#[derive(Debug)]
pub struct Streamed<R> {
    inner: R,
    scratch: Vec<u8>,
}

impl<R: Read> Streamed<R> {
    pub fn new(inner: R) -> Self {
        Streamed {
            inner,
            scratch: Vec::new(),
        }
    }
}

impl<R: Read> Read for Streamed<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read> Source for Streamed<R> {
    fn skip(&mut self, count: u64) -> Result<u64> {
        if self.scratch.is_empty() {
            self.scratch = vec![0u8; BUFFER_SIZE];
        }
        transfer::discard(&mut self.inner, count, &mut self.scratch)
    }
}
