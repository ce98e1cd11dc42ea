//! Tests for creating archives from real files and extracting them again.
//!
//! These tests verify that contents, permissions and whole-second times
//! survive a round trip, and that selective extraction touches nothing else.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use tempfile::TempDir;
use viktar_format::{
    AddFileError, ArchiveReader, ArchiveWriter, EntryName, Selection, BUFFER_SIZE, HEADER_LEN,
    MAGIC_BYTES, NAME_LEN,
};

/// Helper to create a source file with the given contents, mode and times.
fn write_source(dir: &Path, name: &str, contents: &[u8], mode: u32, mtime: u64) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();

    let file = fs::File::options().write(true).open(&path).unwrap();
    file.set_times(
        fs::FileTimes::new()
            .set_accessed(UNIX_EPOCH + Duration::new(mtime - 50, 123))
            .set_modified(UNIX_EPOCH + Duration::new(mtime, 456)),
    )
    .unwrap();
    path
}

/// Helper to create the archive directory, source directory and output directory.
fn dirs() -> (TempDir, PathBuf, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let out = temp_dir.path().join("out");
    fs::create_dir(&src).unwrap();
    fs::create_dir(&out).unwrap();
    let archive = temp_dir.path().join("test.viktar");
    (temp_dir, src, out, archive)
}

fn archive_files(archive: &Path, files: &[(&str, &Path)]) {
    let mut writer = ArchiveWriter::create(archive).unwrap();
    for (name, path) in files {
        writer
            .append_file_as(EntryName::new(name).unwrap(), path)
            .unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn test_round_trip_restores_contents_mode_and_times() {
    let (_temp_dir, src, out, archive) = dirs();

    let mut big = Vec::with_capacity(BUFFER_SIZE * 10 + 333);
    for i in 0..BUFFER_SIZE * 10 + 333 {
        big.push((i % 251) as u8);
    }

    let mut tricky = MAGIC_BYTES.to_vec();
    tricky.extend_from_slice(b"payload after a fake signature");

    let inputs: Vec<(&str, Vec<u8>, u32, u64)> = vec![
        ("empty", vec![], 0o600, 1_500_000_000),
        ("text.txt", b"hello viktar\n".to_vec(), 0o644, 1_500_000_100),
        ("tricky.bin", tricky, 0o640, 1_500_000_200),
        ("big.bin", big, 0o755, 1_500_000_300),
    ];

    let paths = inputs
        .iter()
        .map(|(name, data, mode, mtime)| write_source(&src, name, data, *mode, *mtime))
        .collect::<Vec<_>>();
    let files = inputs
        .iter()
        .zip(paths.iter())
        .map(|((name, ..), path)| (*name, path.as_path()))
        .collect::<Vec<_>>();
    archive_files(&archive, &files);

    let mut reader = ArchiveReader::open(&archive).unwrap();
    let stats = reader.extract_all(&out, &Selection::all()).unwrap();
    assert_eq!(stats.extracted, 4);
    assert_eq!(stats.skipped, 0);
    assert!(stats.failed.is_empty());

    for (name, data, mode, mtime) in &inputs {
        let restored = out.join(name);

        // Check times before reading, which may touch atime.
        let meta = fs::metadata(&restored).unwrap();
        assert_eq!(meta.mode() & 0o777, *mode, "mode of {}", name);
        assert_eq!(meta.mtime(), *mtime as i64, "mtime of {}", name);
        assert_eq!(meta.mtime_nsec(), 0, "mtime is whole seconds for {}", name);
        assert_eq!(meta.atime(), (*mtime - 50) as i64, "atime of {}", name);

        assert_eq!(&fs::read(&restored).unwrap(), data, "contents of {}", name);
    }
}

#[test]
fn test_selective_extraction_leaves_others_alone() {
    let (_temp_dir, src, out, archive) = dirs();

    let a = write_source(&src, "a.txt", b"aaa", 0o644, 1_400_000_000);
    let b = write_source(&src, "b.txt", b"bbb", 0o644, 1_400_000_000);
    let c = write_source(&src, "c.txt", b"ccc", 0o644, 1_400_000_000);
    archive_files(
        &archive,
        &[("a.txt", a.as_path()), ("b.txt", b.as_path()), ("c.txt", c.as_path())],
    );

    fs::write(out.join("b.txt"), b"untouched").unwrap();

    let mut reader = ArchiveReader::open(&archive).unwrap();
    let stats = reader
        .extract_all(&out, &Selection::new(["a.txt", "c.txt", "not-there"]))
        .unwrap();

    assert_eq!(stats.extracted, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"aaa");
    assert_eq!(fs::read(out.join("b.txt")).unwrap(), b"untouched");
    assert_eq!(fs::read(out.join("c.txt")).unwrap(), b"ccc");
    assert!(!out.join("not-there").exists());
}

#[test]
fn test_uncreatable_destination_is_skipped() {
    let (_temp_dir, src, out, archive) = dirs();

    let a = write_source(&src, "a", b"first", 0o644, 1_400_000_000);
    let b = write_source(&src, "b", b"second", 0o644, 1_400_000_000);
    archive_files(&archive, &[("no/such/dir/a", a.as_path()), ("b", b.as_path())]);

    let mut reader = ArchiveReader::open(&archive).unwrap();
    let stats = reader.extract_all(&out, &Selection::all()).unwrap();

    assert_eq!(stats.extracted, 1);
    assert_eq!(stats.failed.len(), 1);
    assert_eq!(stats.failed[0].name.to_string(), "no/such/dir/a");
    assert_eq!(fs::read(out.join("b")).unwrap(), b"second");
}

#[test]
fn test_long_names_are_truncated() {
    let (_temp_dir, src, _out, archive) = dirs();

    let long = "this_name_is_far_too_long_for_the_field.txt";
    let path = write_source(&src, long, b"x", 0o644, 1_400_000_000);

    let mut writer = ArchiveWriter::create(&archive).unwrap();
    let header = writer.append_file(&path).unwrap();
    writer.finish().unwrap();

    let full = path.to_str().unwrap();
    assert_eq!(header.name.to_string(), &full[..NAME_LEN]);

    let mut reader = ArchiveReader::open(&archive).unwrap();
    let listed = reader.next_header().unwrap().unwrap();
    assert_eq!(listed.name.as_bytes().len(), NAME_LEN);
    assert_eq!(listed.name, header.name);
}

#[test]
fn test_owner_and_ctime_are_stored_not_applied() {
    let (_temp_dir, src, out, archive) = dirs();

    let path = write_source(&src, "owned", b"x", 0o644, 1_400_000_000);
    let original = fs::metadata(&path).unwrap();
    archive_files(&archive, &[("owned", path.as_path())]);

    let mut reader = ArchiveReader::open(&archive).unwrap();
    let header = reader.next_header().unwrap().unwrap();
    assert_eq!(header.uid, original.uid());
    assert_eq!(header.gid, original.gid());
    assert_eq!(header.ctime.secs, original.ctime());

    let mut reader = ArchiveReader::open(&archive).unwrap();
    reader.extract_all(&out, &Selection::all()).unwrap();
    let restored = fs::metadata(out.join("owned")).unwrap();
    // The change time is whenever extraction ran, never the stored one.
    assert!(restored.ctime() >= header.ctime.secs);
}

#[test]
fn test_unusable_sources_are_skipped() {
    let (_temp_dir, src, _out, archive) = dirs();

    let good = write_source(&src, "good", b"ok", 0o644, 1_400_000_000);
    let mut writer = ArchiveWriter::create(&archive).unwrap();

    let before = writer.position();
    let missing = writer.append_file(src.join("missing")).unwrap_err();
    assert!(matches!(missing, AddFileError::Stat { .. }));
    assert!(!missing.is_fatal());

    let dir = writer.append_file(&src).unwrap_err();
    assert!(matches!(dir, AddFileError::NotRegularFile { .. }));
    assert!(!dir.is_fatal());
    assert_eq!(writer.position(), before);

    writer
        .append_file_as(EntryName::new("good").unwrap(), &good)
        .unwrap();
    writer.finish().unwrap();

    let len = fs::metadata(&archive).unwrap().len();
    assert_eq!(len, (MAGIC_BYTES.len() + HEADER_LEN + 2) as u64);
}

#[test]
fn test_empty_archive() {
    let (_temp_dir, _src, out, archive) = dirs();

    ArchiveWriter::create(&archive).unwrap().finish().unwrap();
    assert_eq!(fs::read(&archive).unwrap(), MAGIC_BYTES);

    let mut reader = ArchiveReader::open(&archive).unwrap();
    assert_eq!(reader.headers().count(), 0);

    let mut reader = ArchiveReader::open(&archive).unwrap();
    let stats = reader.extract_all(&out, &Selection::all()).unwrap();
    assert_eq!(stats.extracted, 0);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_create_truncates_existing_archive() {
    let (_temp_dir, _src, _out, archive) = dirs();

    fs::write(&archive, vec![0xffu8; 4096]).unwrap();
    ArchiveWriter::create(&archive).unwrap().finish().unwrap();
    assert_eq!(fs::read(&archive).unwrap(), MAGIC_BYTES);
}
