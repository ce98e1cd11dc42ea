use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use viktar_format::ArchiveWriter;

use crate::error::{Error, Result};
use crate::util::{archive_label, report};

pub fn run(archive: Option<&Path>, files: &[PathBuf]) -> Result<()> {
    let label = archive_label(archive, "stdout");

    match archive {
        Some(path) => {
            let writer = ArchiveWriter::create(path)
                .map_err(|source| Error::CreateArchive {
                    archive: label.clone(),
                    source,
                })?;
            append_all(writer, files, archive, &label)
        }
        None => {
            let writer = ArchiveWriter::new(BufWriter::new(io::stdout().lock()))
                .map_err(|source| Error::CreateArchive {
                    archive: label.clone(),
                    source,
                })?;
            append_all(writer, files, None, &label)
        }
    }
}

fn append_all<W: Write>(
    mut writer: ArchiveWriter<W>,
    files: &[PathBuf],
    archive: Option<&Path>,
    label: &str,
) -> Result<()> {
    let own = archive.and_then(|path| std::fs::canonicalize(path).ok());

    for path in files {
        if own.is_some() && std::fs::canonicalize(path).ok() == own {
            eprintln!(
                "viktar: refusing to add the archive `{}` to itself; skipping",
                path.display()
            );
            continue;
        }

        match writer.append_file(path) {
            Ok(_) => {}
            Err(source) if !source.is_fatal() => report(&Error::AddFile {
                path: path.clone(),
                source,
            }),
            Err(source) => {
                return Err(Error::AddFile {
                    path: path.clone(),
                    source,
                })
            }
        }
    }

    let entries = writer.entries();
    writer.finish().map_err(|source| Error::FinishArchive {
        archive: label.to_string(),
        source,
    })?;

    tracing::debug!(archive = label, entries, "archive created");
    Ok(())
}
