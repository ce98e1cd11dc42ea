use std::ffi::OsStr;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{BodyError, ExtractError, ReadError};
use crate::fs::{apply_times, create_restored};
use crate::header::{Header, HEADER_LEN, MAGIC_BYTES};
use crate::name::{os_str_bytes, EntryName};
use crate::source::Source;
use crate::transfer::{self, TransferError, BUFFER_SIZE};

/// Names selected for extraction. Empty means every entry.
#[derive(Debug, Default, Clone)]
pub struct Selection(Vec<Vec<u8>>);

impl Selection {
    pub fn all() -> Selection {
        Selection(vec![])
    }

    pub fn new<I, S>(names: I) -> Selection
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Selection(
            names
                .into_iter()
                .map(|n| os_str_bytes(n.as_ref()).into_owned())
                .collect(),
        )
    }

    #[inline(always)]
    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &EntryName) -> bool {
        self.is_all() || self.0.iter().any(|n| n.as_slice() == name.as_bytes())
    }
}

/// A per-entry problem that extraction stepped over.
#[derive(Debug)]
pub struct ExtractFailure {
    pub name: EntryName,
    pub path: PathBuf,
    pub error: std::io::Error,
}

#[derive(Debug, Default)]
pub struct ExtractStats {
    pub extracted: u64,
    pub skipped: u64,
    pub failed: Vec<ExtractFailure>,
}

/// Reads an archive front to back.
///
/// Construction validates the signature. Each call to
/// [`ArchiveReader::next_header`] first steps over whatever is left of the
/// previous body, so callers may ignore bodies they do not want.
#[derive(Debug)]
pub struct ArchiveReader<S: Source> {
    inner: S,
    buf: Vec<u8>,
    position: u64,
    /// Name, size and unread byte count of the current body.
    pending: Option<(EntryName, u64, u64)>,
}

impl ArchiveReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let file = File::open(path.as_ref())?;
        ArchiveReader::new(file)
    }
}

impl<S: Source> ArchiveReader<S> {
    pub fn new(mut inner: S) -> Result<Self, ReadError> {
        let mut magic = [0u8; MAGIC_BYTES.len()];
        let n = transfer::read_full(&mut inner, &mut magic)?;
        if n != MAGIC_BYTES.len() || &magic != MAGIC_BYTES {
            return Err(ReadError::InvalidSignature);
        }

        Ok(ArchiveReader {
            inner,
            buf: vec![0u8; BUFFER_SIZE],
            position: MAGIC_BYTES.len() as u64,
            pending: None,
        })
    }

    /// Offset of the next unread byte, from the start of the archive.
    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read the next header, or `None` at a clean end of archive.
    pub fn next_header(&mut self) -> Result<Option<Header>, ReadError> {
        self.skip_body()?;

        let offset = self.position;
        let mut raw = [0u8; HEADER_LEN];
        let n = transfer::read_full(&mut self.inner, &mut raw)?;
        self.position += n as u64;

        match n {
            0 => return Ok(None),
            HEADER_LEN => {}
            actual => {
                return Err(ReadError::TruncatedHeader {
                    offset,
                    expected: HEADER_LEN,
                    actual,
                })
            }
        }

        let header =
            Header::from_bytes(&raw).map_err(|source| ReadError::InvalidHeader { offset, source })?;

        tracing::debug!(
            start = format_args!("{:#x}", offset),
            name = %header.name,
            size = header.size,
            "read header"
        );

        self.pending = Some((header.name.clone(), header.size, header.size));
        Ok(Some(header))
    }

    /// Step over the rest of the current body.
    pub fn skip_body(&mut self) -> Result<(), ReadError> {
        let (name, expected, remaining) = match self.pending.take() {
            Some(v) => v,
            None => return Ok(()),
        };

        let skipped = self.inner.skip(remaining)?;
        self.position += skipped;

        if skipped < remaining {
            return Err(ReadError::TruncatedBody {
                name,
                actual: expected - remaining + skipped,
                expected,
            });
        }
        Ok(())
    }

    /// Copy the rest of the current body into `dest`.
    pub fn copy_body<W: Write + ?Sized>(&mut self, dest: &mut W) -> Result<u64, BodyError> {
        let (name, expected, remaining) = match self.pending.take() {
            Some(v) => v,
            None => return Ok(0),
        };

        let copied = transfer::copy_exact(&mut self.inner, dest, remaining, &mut self.buf)
            .map_err(|e| match e {
                TransferError::Read(source) => BodyError::Read(ReadError::Io(source)),
                TransferError::Write(source) => BodyError::Write(source),
            })?;
        self.position += copied;

        if copied < remaining {
            return Err(BodyError::Read(ReadError::TruncatedBody {
                name,
                actual: expected - remaining + copied,
                expected,
            }));
        }
        Ok(copied)
    }

    /// Iterate over the remaining headers, skipping every body.
    pub fn headers(&mut self) -> Headers<'_, S> {
        Headers {
            reader: self,
            done: false,
        }
    }

    /// Restore every selected entry below `dest`.
    ///
    /// Entry names are joined onto `dest` as stored; no directories are
    /// created. A destination that cannot be created is recorded in the
    /// returned stats and its body skipped.
    pub fn extract_all<P: AsRef<Path>>(
        &mut self,
        dest: P,
        selection: &Selection,
    ) -> Result<ExtractStats, ExtractError> {
        self.extract_all_with(dest, selection, |_| {})
    }

    /// Like [`ArchiveReader::extract_all`], calling `on_failure` for each
    /// skipped destination as soon as it happens.
    pub fn extract_all_with<P, F>(
        &mut self,
        dest: P,
        selection: &Selection,
        mut on_failure: F,
    ) -> Result<ExtractStats, ExtractError>
    where
        P: AsRef<Path>,
        F: FnMut(&ExtractFailure),
    {
        let dest = dest.as_ref();
        let mut stats = ExtractStats::default();

        while let Some(header) = self.next_header()? {
            if !selection.contains(&header.name) {
                stats.skipped += 1;
                continue;
            }

            let path = dest.join(header.name.to_path_buf());
            match self.extract_entry(&header, &path)? {
                Ok(()) => stats.extracted += 1,
                Err(error) => {
                    tracing::debug!(name = %header.name, path = %path.display(), %error, "cannot create file");
                    let failure = ExtractFailure {
                        name: header.name,
                        path,
                        error,
                    };
                    on_failure(&failure);
                    stats.failed.push(failure);
                }
            }
        }

        Ok(stats)
    }

    /// The outer result is fatal, the inner one is the per-entry outcome.
    fn extract_entry(
        &mut self,
        header: &Header,
        path: &Path,
    ) -> Result<std::io::Result<()>, ExtractError> {
        let mut file = match create_restored(path, header) {
            Ok(file) => file,
            Err(e) => return Ok(Err(e)),
        };

        self.copy_body(&mut file).map_err(|e| match e {
            BodyError::Read(e) => ExtractError::Read(e),
            BodyError::Write(source) => ExtractError::Write {
                path: path.to_path_buf(),
                source,
            },
        })?;

        if let Err(error) = apply_times(&file, header) {
            tracing::warn!(path = %path.display(), %error, "cannot set file times");
        }

        tracing::debug!(name = %header.name, size = header.size, "extracted");
        Ok(Ok(()))
    }
}

/// Iterator returned by [`ArchiveReader::headers`]. Stops after the first
/// error.
pub struct Headers<'a, S: Source> {
    reader: &'a mut ArchiveReader<S>,
    done: bool,
}

impl<'a, S: Source> Iterator for Headers<'a, S> {
    type Item = Result<Header, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.next_header() {
            Ok(Some(header)) => Some(Ok(header)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
