use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::error::AddFileError;
use crate::fs::header_from_metadata;
use crate::header::{Header, HEADER_LEN, MAGIC_BYTES};
use crate::name::EntryName;
use crate::transfer::{self, TransferError, BUFFER_SIZE};

/// Writes an archive front to back: the signature once, then one header and
/// body per appended file.
#[derive(Debug)]
pub struct ArchiveWriter<W: Write> {
    inner: W,
    buf: Vec<u8>,
    position: u64,
    entries: u64,
}

impl ArchiveWriter<BufWriter<File>> {
    /// Create or truncate the archive at `path` and write the signature.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let file = options.open(path.as_ref())?;
        ArchiveWriter::new(BufWriter::new(file))
    }
}

impl<W: Write> ArchiveWriter<W> {
    /// Start an archive on any writer, such as standard output.
    pub fn new(mut inner: W) -> std::io::Result<Self> {
        transfer::write_full(&mut inner, MAGIC_BYTES)?;

        Ok(ArchiveWriter {
            inner,
            buf: vec![0u8; BUFFER_SIZE],
            position: MAGIC_BYTES.len() as u64,
            entries: 0,
        })
    }

    /// Bytes written so far, signature included.
    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[inline(always)]
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Append the file at `path`, stored under the path itself (truncated to
    /// fit the name field).
    pub fn append_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Header, AddFileError> {
        let path = path.as_ref();
        let name = EntryName::new(path).map_err(|source| AddFileError::InvalidName {
            path: path.to_path_buf(),
            source,
        })?;
        self.append_file_as(name, path)
    }

    /// Append the file at `path` under an explicit entry name.
    ///
    /// The file is opened before anything is written, so a file that cannot
    /// be read leaves no trace in the archive.
    pub fn append_file_as<P: AsRef<Path>>(
        &mut self,
        name: EntryName,
        path: P,
    ) -> Result<Header, AddFileError> {
        let path = path.as_ref();

        let meta = std::fs::metadata(path).map_err(|source| AddFileError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        if !meta.is_file() {
            return Err(AddFileError::NotRegularFile {
                path: path.to_path_buf(),
            });
        }

        let mut file = File::open(path).map_err(|source| AddFileError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let header = header_from_metadata(name, &meta);
        self.append(&header, &mut file)?;
        Ok(header)
    }

    /// Write `header` followed by exactly `header.size` bytes from `reader`.
    pub fn append<R: Read>(&mut self, header: &Header, reader: &mut R) -> Result<(), AddFileError> {
        let start = self.position;
        let encoded = header.to_bytes().map_err(AddFileError::Write)?;
        transfer::write_full(&mut self.inner, &encoded).map_err(AddFileError::Write)?;
        self.position += HEADER_LEN as u64;

        let copied = transfer::copy_exact(reader, &mut self.inner, header.size, &mut self.buf)
            .map_err(|e| match e {
                TransferError::Read(source) => AddFileError::Read {
                    name: header.name.clone(),
                    source,
                },
                TransferError::Write(source) => AddFileError::Write(source),
            })?;
        self.position += copied;

        if copied < header.size {
            return Err(AddFileError::SourceTruncated {
                name: header.name.clone(),
                expected: header.size,
                actual: copied,
            });
        }

        // Anything past the recorded size arrived after `stat` and stays out.
        let mut probe = [0u8; 1];
        match transfer::read_full(reader, &mut probe) {
            Ok(0) => {}
            Ok(_) => tracing::warn!(name = %header.name, size = header.size, "file grew while being archived; extra bytes not stored"),
            Err(e) => tracing::warn!(name = %header.name, error = %e, "cannot probe for trailing bytes"),
        }

        self.entries += 1;
        tracing::debug!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", self.position),
            name = %header.name,
            size = header.size,
            "wrote entry"
        );

        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> std::io::Result<W> {
        self.inner.flush()?;
        tracing::debug!(entries = self.entries, bytes = self.position, "finished archive");
        Ok(self.inner)
    }
}
