use std::fs::File;
use std::io;
use std::path::Path;

use viktar_format::{ArchiveReader, Source, Streamed, Timestamp};

use crate::error::{Error, Result};

/// How an archive is named in messages and listings.
#[inline(always)]
pub fn archive_label(path: Option<&Path>, stream: &str) -> String {
    match path {
        Some(path) => format!("`{}`", path.display()),
        None => stream.to_string(),
    }
}

/// Open the archive at `path`, or standard input, and check its signature.
pub fn open_archive(path: Option<&Path>) -> Result<ArchiveReader<Box<dyn Source>>> {
    let source: Box<dyn Source> = match path {
        Some(path) => Box::new(File::open(path).map_err(|source| Error::OpenArchive {
            path: path.to_path_buf(),
            source,
        })?),
        None => Box::new(Streamed::new(io::stdin().lock())),
    };

    ArchiveReader::new(source).map_err(|source| Error::ReadArchive {
        archive: archive_label(path, "stdin"),
        source,
    })
}

/// Print a recoverable error and its causes on one line.
pub fn report(err: &(dyn std::error::Error + 'static)) {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    eprintln!("viktar: {}", message);
}

macro_rules! add {
    ($ident:ident, $value:tt => $s:ident) => {
        if $ident {
            $s.push($value);
        } else {
            $s.push('-');
        }
    };
}

const S_IFMT: u32 = 0o170000;
const S_IFREG: u32 = 0o100000;
const S_IFDIR: u32 = 0o040000;
const S_IFLNK: u32 = 0o120000;

#[inline(always)]
pub fn format_mode(mode: u32) -> String {
    let or = (mode & 0o400) > 0;
    let ow = (mode & 0o200) > 0;
    let ox = (mode & 0o100) > 0;
    let gr = (mode & 0o040) > 0;
    let gw = (mode & 0o020) > 0;
    let gx = (mode & 0o010) > 0;
    let ar = (mode & 0o004) > 0;
    let aw = (mode & 0o002) > 0;
    let ax = (mode & 0o001) > 0;

    let mut s = String::with_capacity(10);
    s.push(match mode & S_IFMT {
        S_IFREG => '-',
        S_IFDIR => 'd',
        S_IFLNK => 'l',
        _ => '?',
    });
    add!(or, 'r' => s);
    add!(ow, 'w' => s);
    add!(ox, 'x' => s);
    add!(gr, 'r' => s);
    add!(gw, 'w' => s);
    add!(gx, 'x' => s);
    add!(ar, 'r' => s);
    add!(aw, 'w' => s);
    add!(ax, 'x' => s);

    s
}

#[inline(always)]
pub fn format_time(time: Timestamp) -> String {
    use chrono::TimeZone;

    chrono::Utc
        .timestamp_opt(time.secs, 0)
        .single()
        .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_else(|| time.secs.to_string())
}
