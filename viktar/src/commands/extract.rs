use std::path::{Path, PathBuf};

use viktar_format::{ExtractFailure, Selection};

use crate::error::{Error, Result};
use crate::util::{archive_label, open_archive};

pub fn run(archive: Option<&Path>, names: &[PathBuf]) -> Result<()> {
    let mut reader = open_archive(archive)?;
    let selection = Selection::new(names);

    let stats = reader
        .extract_all_with(".", &selection, report_failure)
        .map_err(|source| Error::Extract {
            archive: archive_label(archive, "stdin"),
            source,
        })?;

    tracing::debug!(
        extracted = stats.extracted,
        skipped = stats.skipped,
        failed = stats.failed.len(),
        "extraction finished"
    );
    Ok(())
}

fn report_failure(failure: &ExtractFailure) {
    eprintln!(
        "viktar: cannot create `{}`: {}; skipped",
        failure.path.display(),
        failure.error
    );
}
