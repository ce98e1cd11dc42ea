use std::path::PathBuf;

use crate::name::{EntryName, IntoEntryNameError};

/// Failures while reading the archive stream itself. All of them end the
/// read: the framing after the failure point cannot be trusted.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("invalid signature: not a viktar archive")]
    InvalidSignature,

    #[error("truncated header at offset {offset:#x}: expected {expected} bytes, found {actual}")]
    TruncatedHeader {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("truncated body for `{name}`: expected {expected} bytes, found {actual}")]
    TruncatedBody {
        name: EntryName,
        expected: u64,
        actual: u64,
    },

    #[error("invalid header at offset {offset:#x}")]
    InvalidHeader {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read archive")]
    Io(#[from] std::io::Error),
}

/// Failures while adding one file to an archive.
///
/// Only some of these stop the whole run, see [`AddFileError::is_fatal`].
#[derive(Debug, thiserror::Error)]
pub enum AddFileError {
    #[error("cannot stat `{}`", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` is not a regular file", .path.display())]
    NotRegularFile { path: PathBuf },

    #[error("cannot open `{}` for reading", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot use `{}` as an entry name", .path.display())]
    InvalidName {
        path: PathBuf,
        #[source]
        source: IntoEntryNameError,
    },

    #[error("`{name}` shrank while being archived: expected {expected} bytes, read {actual}")]
    SourceTruncated {
        name: EntryName,
        expected: u64,
        actual: u64,
    },

    #[error("cannot read contents of `{name}`")]
    Read {
        name: EntryName,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write to archive")]
    Write(#[source] std::io::Error),
}

impl AddFileError {
    /// Whether the archive is left unusable. Anything that fails before the
    /// header is written only costs that one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AddFileError::SourceTruncated { .. } | AddFileError::Read { .. } | AddFileError::Write(_)
        )
    }
}

/// Failures while copying an entry body out of the archive.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("cannot write entry body")]
    Write(#[source] std::io::Error),
}

/// Failures that stop an extraction. Per-entry problems that can be stepped
/// over are collected in [`crate::ExtractStats`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("cannot write `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
