use std::io::{self, BufWriter, Write};
use std::path::Path;

use viktar_format::{ArchiveReader, Header, Source};

use crate::error::{Error, Result};
use crate::util::{archive_label, format_mode, format_time, open_archive};

pub fn run(archive: Option<&Path>, headers: bool) -> Result<()> {
    let mut reader = open_archive(archive)?;

    let mut out = BufWriter::new(io::stdout().lock());
    let listed = print_listing(&mut reader, archive, headers, &mut out);

    // Whatever was listed before a failure is still shown.
    out.flush().map_err(|source| Error::Output { source })?;
    listed
}

/// Write the listing of every remaining entry in `reader` to `out`.
/// `archive` is `None` when reading standard input.
pub fn print_listing<S: Source, W: Write>(
    reader: &mut ArchiveReader<S>,
    archive: Option<&Path>,
    headers: bool,
    out: &mut W,
) -> Result<()> {
    let output = |source| Error::Output { source };

    let title = archive
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "stdin".into());
    writeln!(out, "Contents of viktar file: \"{}\"", title).map_err(output)?;

    for header in reader.headers() {
        let header = header.map_err(|source| Error::ReadArchive {
            archive: archive_label(archive, "stdin"),
            source,
        })?;

        writeln!(out, "\tfile name: {}", header.name).map_err(output)?;
        if headers {
            print_header(&header, out).map_err(output)?;
        }
    }

    Ok(())
}

fn print_header<W: Write>(header: &Header, out: &mut W) -> io::Result<()> {
    writeln!(out, "\t\tmode:  {}", format_mode(header.mode))?;
    writeln!(out, "\t\tuser:  {}", header.uid)?;
    writeln!(out, "\t\tgroup: {}", header.gid)?;
    writeln!(out, "\t\tsize:  {}", header.size)?;
    writeln!(out, "\t\tmtime: {}", format_time(header.mtime))?;
    writeln!(out, "\t\tatime: {}", format_time(header.atime))
}
