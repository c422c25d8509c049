use filedups::duplicates::DuplicateFinder;
use filedups::output::{read_list, write_list_file, write_records, ListError};
use std::fs;
use tempfile::tempdir;

fn md5_hex(content: &[u8]) -> String {
    use md5::{Digest, Md5};
    Md5::digest(content)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[test]
fn test_list_written_from_scan() {
    let tree = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(tree.path().join("a"), b"abc").unwrap();
    fs::write(tree.path().join("b"), b"abc").unwrap();
    fs::write(tree.path().join("c"), b"xyz").unwrap();

    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates(tree.path())
        .unwrap();
    let list = out.path().join("duplicates.lst");
    let written = write_list_file(&list, |w| {
        write_records(w, &outcome.records, &outcome.arena)
    })
    .unwrap();

    assert_eq!(written, 2);
    let text = fs::read_to_string(&list).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], "900150983cd24fb0d6963f7d28e17f72");
        assert!(fields[1].parse::<u64>().is_ok());
        assert_eq!(fields[2], "3");
        assert!(fields[3].starts_with('/'));
    }
}

#[test]
fn test_list_round_trips_through_reader() {
    let tree = tempdir().unwrap();
    fs::write(tree.path().join("one"), b"shared bytes").unwrap();
    fs::write(tree.path().join("two"), b"shared bytes").unwrap();

    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates(tree.path())
        .unwrap();
    let list = tree.path().join("duplicates.lst");
    write_list_file(&list, |w| write_records(w, &outcome.records, &outcome.arena)).unwrap();

    let records = read_list(&list).unwrap();
    assert_eq!(records.len(), 2);
    for (parsed, record) in records.iter().zip(&outcome.records) {
        assert_eq!(parsed.fingerprint, md5_hex(b"shared bytes"));
        assert_eq!(parsed.inode, record.inode);
        assert_eq!(parsed.size, 12);
        assert_eq!(parsed.path, outcome.path_of(record));
    }
}

#[test]
fn test_list_overwritten_not_appended() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("duplicates.lst");
    fs::write(&list, "stale contents that must disappear\n").unwrap();

    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    write_list_file(&list, |w| write_records(w, &outcome.records, &outcome.arena)).unwrap();

    assert!(fs::read(&list).unwrap().is_empty());
}

#[test]
fn test_read_list_reports_malformed_line() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("broken.lst");
    fs::write(
        &list,
        "900150983cd24fb0d6963f7d28e17f72\t1\t3\t/tmp/a\nnot a record\n",
    )
    .unwrap();

    match read_list(&list).unwrap_err() {
        ListError::MissingFields { line, found } => {
            assert_eq!(line, 2);
            assert_eq!(found, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_read_list_missing_file() {
    let dir = tempdir().unwrap();
    let err = read_list(&dir.path().join("absent.lst")).unwrap_err();
    assert!(matches!(err, ListError::Io { .. }));
}

#[test]
fn test_path_with_tab_survives() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("tab\there"), b"tabbed").unwrap();
    fs::write(dir.path().join("plain"), b"tabbed").unwrap();

    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let list = dir.path().join("out.lst");
    write_list_file(&list, |w| write_records(w, &outcome.records, &outcome.arena)).unwrap();

    let records = read_list(&list).unwrap();
    assert!(records.iter().any(|r| r.path.ends_with("tab\there")));
}
