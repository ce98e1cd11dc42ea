pub mod reader;
pub mod writer;

pub use self::reader::{ArchiveReader, ExtractFailure, ExtractStats, Headers, Selection};
pub use self::writer::ArchiveWriter;
