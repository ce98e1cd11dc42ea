use std::path::PathBuf;

use viktar_format::{AddFileError, ExtractError, ReadError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read archive {archive}")]
    ReadArchive {
        archive: String,
        #[source]
        source: ReadError,
    },

    #[error("Cannot create archive {archive}")]
    CreateArchive {
        archive: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot add file `{}` to archive", .path.display())]
    AddFile {
        path: PathBuf,
        #[source]
        source: AddFileError,
    },

    #[error("Cannot finish archive {archive}")]
    FinishArchive {
        archive: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot extract files from {archive}")]
    Extract {
        archive: String,
        #[source]
        source: ExtractError,
    },

    #[error("Cannot write listing")]
    Output {
        #[source]
        source: std::io::Error,
    },
}
