//! Full-length reads and writes over streams that may transfer less than
//! requested per call.
//!
//! Every byte of archive or entry data moves through these functions.
//! `Interrupted` is retried; any other error is handed back to the caller.

use std::io::{ErrorKind, Read, Result, Write};

/// Size of the transfer buffer used for entry bodies and discarding skips.
pub const BUFFER_SIZE: usize = 64 * 1024;

/// Which side of a copy failed.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("read failed")]
    Read(#[source] std::io::Error),

    #[error("write failed")]
    Write(#[source] std::io::Error),
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
///
/// Returns the number of bytes read. A result smaller than `buf.len()` means
/// the stream is exhausted; whether that is a clean end or a truncation is up
/// to the caller.
pub fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Write all of `buf` to `writer`.
pub fn write_full<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
    let mut total = 0;
    while total < buf.len() {
        match writer.write(&buf[total..]) {
            Ok(0) => {
                return Err(std::io::Error::new(
                    ErrorKind::WriteZero,
                    "stream accepted no more bytes",
                ))
            }
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Copy up to `count` bytes from `reader` to `writer` in chunks of at most
/// `buf.len()` bytes.
///
/// Returns the number of bytes copied, which is less than `count` only when
/// the reader ran dry.
pub fn copy_exact<R, W>(
    reader: &mut R,
    writer: &mut W,
    count: u64,
    buf: &mut [u8],
) -> std::result::Result<u64, TransferError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut remaining = count;
    while remaining > 0 {
        let want = chunk_len(remaining, buf.len());
        let n = read_full(reader, &mut buf[..want]).map_err(TransferError::Read)?;
        write_full(writer, &buf[..n]).map_err(TransferError::Write)?;
        remaining -= n as u64;
        if n < want {
            break;
        }
    }
    Ok(count - remaining)
}

/// Read and drop up to `count` bytes. Used to skip forward on streams that
/// cannot seek.
pub fn discard<R: Read + ?Sized>(reader: &mut R, count: u64, buf: &mut [u8]) -> Result<u64> {
    let mut remaining = count;
    while remaining > 0 {
        let want = chunk_len(remaining, buf.len());
        let n = read_full(reader, &mut buf[..want])?;
        remaining -= n as u64;
        if n < want {
            break;
        }
    }
    Ok(count - remaining)
}

#[inline(always)]
fn chunk_len(remaining: u64, cap: usize) -> usize {
    if remaining < cap as u64 {
        remaining as usize
    } else {
        cap
    }
}
