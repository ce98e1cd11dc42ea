//! Support library for the viktar archive format.
//!
//! An archive is the [`MAGIC_BYTES`] signature followed by entries, each a
//! fixed-size [`Header`] and exactly `size` bytes of file contents. There is
//! no index and no trailer: readers walk the entries in order until the
//! stream ends.

mod de;
mod error;
pub mod file;
pub mod fs;
mod header;
pub mod name;
mod ser;
pub mod source;
pub mod transfer;

pub use error::{AddFileError, BodyError, ExtractError, ReadError};
pub use file::{ArchiveReader, ArchiveWriter, ExtractFailure, ExtractStats, Headers, Selection};
pub use header::{Header, Timestamp, HEADER_LEN, MAGIC_BYTES, NAME_LEN};
pub use name::{EntryName, IntoEntryNameError};
pub use source::{Source, Streamed};
pub use transfer::BUFFER_SIZE;
