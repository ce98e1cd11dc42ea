//! Filesystem metadata in and out of headers.

use std::fs::{File, FileTimes, Metadata, OpenOptions};
use std::io::{Error, ErrorKind, Result};
use std::path::Path;

use crate::header::{Header, Timestamp};
use crate::name::EntryName;

/// Build a header from `stat` output.
///
/// On Unix: mode, uid, gid, size, atime, mtime, ctime
#[cfg(unix)]
pub fn header_from_metadata(name: EntryName, meta: &Metadata) -> Header {
    use std::os::unix::fs::MetadataExt;

    Header {
        name,
        mode: meta.mode(),
        uid: meta.uid(),
        gid: meta.gid(),
        size: meta.size(),
        atime: Timestamp::new(meta.atime(), meta.atime_nsec() as u32),
        mtime: Timestamp::new(meta.mtime(), meta.mtime_nsec() as u32),
        ctime: Timestamp::new(meta.ctime(), meta.ctime_nsec() as u32),
    }
}

/// Build a header from portable metadata. Owner and group are zero and the
/// mode is synthesised from the read-only flag.
#[cfg(not(unix))]
pub fn header_from_metadata(name: EntryName, meta: &Metadata) -> Header {
    let time = |t: Result<std::time::SystemTime>| {
        t.map(Timestamp::from_system_time).unwrap_or_default()
    };

    let mode = if meta.permissions().readonly() {
        0o100444
    } else {
        0o100644
    };

    Header {
        name,
        mode,
        uid: 0,
        gid: 0,
        size: meta.len(),
        atime: time(meta.accessed()),
        mtime: time(meta.modified()),
        ctime: time(meta.created()),
    }
}

/// Create or truncate a file for a restored entry, with the stored
/// permission bits as creation mode. The process umask still applies.
pub fn create_restored(path: &Path, header: &Header) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(header.permissions());
    }
    #[cfg(not(unix))]
    let _ = header;

    options.open(path)
}

/// Set access and modification time to the stored whole seconds.
///
/// Owner and group are not restored, and the change time cannot be set.
pub fn apply_times(file: &File, header: &Header) -> Result<()> {
    let out_of_range = || Error::new(ErrorKind::InvalidInput, "timestamp out of range");

    let accessed = header
        .atime
        .whole_seconds()
        .to_system_time()
        .ok_or_else(out_of_range)?;
    let modified = header
        .mtime
        .whole_seconds()
        .to_system_time()
        .ok_or_else(out_of_range)?;

    file.set_times(
        FileTimes::new()
            .set_accessed(accessed)
            .set_modified(modified),
    )
}
