use std::borrow::Cow;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::header::NAME_LEN;

mod error;

pub use self::error::IntoEntryNameError;

/// The name an entry is stored and extracted under.
///
/// Holds the raw bytes of the path as it was given to the writer, cut down to
/// at most [`NAME_LEN`] bytes. A name is never empty and never contains NUL,
/// which is what pads the fixed-width field on disk.
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntryName(pub(crate) Vec<u8>);

/// Raw bytes of an OS string. Lossless on Unix.
#[cfg(unix)]
pub(crate) fn os_str_bytes(s: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(s.as_bytes())
}

#[cfg(not(unix))]
pub(crate) fn os_str_bytes(s: &OsStr) -> Cow<'_, [u8]> {
    match s.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

impl EntryName {
    /// Builds a name from a path, silently truncating it to [`NAME_LEN`] bytes.
    pub fn new<P: AsRef<Path>>(path: P) -> std::result::Result<EntryName, IntoEntryNameError> {
        Self::from_bytes(&os_str_bytes(path.as_ref().as_os_str()))
    }

    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<EntryName, IntoEntryNameError> {
        if bytes.is_empty() {
            return Err(IntoEntryNameError::EmptyName);
        }
        if bytes.contains(&0) {
            return Err(IntoEntryNameError::ContainsNul);
        }

        let len = bytes.len().min(NAME_LEN);
        Ok(EntryName(bytes[..len].to_vec()))
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[cfg(unix)]
    pub fn to_path_buf(&self) -> PathBuf {
        use std::os::unix::ffi::OsStrExt;
        PathBuf::from(OsStr::from_bytes(&self.0))
    }

    #[cfg(not(unix))]
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(String::from_utf8_lossy(&self.0).into_owned())
    }

    /// Exact byte comparison against a name given on the command line.
    pub fn matches<S: AsRef<OsStr>>(&self, candidate: S) -> bool {
        *os_str_bytes(candidate.as_ref()) == *self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
