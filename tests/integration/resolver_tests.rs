use filedups::duplicates::DuplicateFinder;
use filedups::output::{read_list, write_list_file, write_records, SerializedRecord};
use filedups::resolver::{split_groups, GroupingPolicy, Resolver, ResolverOptions, SessionEnd};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Scan `tree`, write the list next to it and read it back as groups.
fn scan_to_groups(tree: &Path, list: &Path) -> Vec<Vec<SerializedRecord>> {
    let outcome = DuplicateFinder::with_defaults().find_duplicates(tree).unwrap();
    write_list_file(list, |w| write_records(w, &outcome.records, &outcome.arena)).unwrap();
    split_groups(&read_list(list).unwrap(), GroupingPolicy::Fingerprint)
}

fn two_copies() -> (TempDir, TempDir, PathBuf, PathBuf) {
    let tree = tempdir().unwrap();
    let work = tempdir().unwrap();
    let a = tree.path().join("a");
    let b = tree.path().join("b");
    fs::write(&a, b"identical payload").unwrap();
    fs::write(&b, b"identical payload").unwrap();
    (tree, work, a, b)
}

fn resolve(reply: &str, groups: &[Vec<SerializedRecord>], save_to: PathBuf) -> (String, SessionEnd) {
    let options = ResolverOptions {
        save_to,
        ..Default::default()
    };
    let mut resolver = Resolver::new(Cursor::new(reply.as_bytes().to_vec()), Vec::new(), options);
    let summary = resolver.run(groups).unwrap();
    let output = String::from_utf8(resolver.into_output()).unwrap();
    (output, summary.end)
}

#[cfg(unix)]
#[test]
fn test_hard_link_leaves_one_inode() {
    use std::os::unix::fs::MetadataExt;

    let (tree, work, a, b) = two_copies();
    let groups = scan_to_groups(tree.path(), &work.path().join("duplicates.lst"));
    assert_eq!(groups.len(), 1);

    let (output, end) = resolve("l\n", &groups, work.path().join("dups.lst"));

    assert_eq!(end, SessionEnd::Exhausted);
    assert!(output.contains("Linked 1 file(s)"));
    let ino_a = fs::metadata(&a).unwrap().ino();
    let ino_b = fs::metadata(&b).unwrap().ino();
    assert_eq!(ino_a, ino_b);
    assert_eq!(fs::read(&b).unwrap(), b"identical payload");
}

#[cfg(unix)]
#[test]
fn test_rescan_after_linking_finds_nothing() {
    let (tree, work, _a, _b) = two_copies();
    let list = work.path().join("duplicates.lst");
    let groups = scan_to_groups(tree.path(), &list);
    resolve("l\n", &groups, work.path().join("dups.lst"));

    assert!(scan_to_groups(tree.path(), &list).is_empty());
}

#[test]
fn test_hard_link_with_vanished_first_copy_keeps_the_rest() {
    let (tree, work, _a, _b) = two_copies();
    let groups = scan_to_groups(tree.path(), &work.path().join("duplicates.lst"));
    let (first, rest) = groups[0].split_first().unwrap();
    fs::remove_file(&first.path).unwrap();

    let (output, _) = resolve("l\n", &groups, work.path().join("dups.lst"));

    assert!(output.contains("Linked 0 file(s), 1 failed"));
    for record in rest {
        assert_eq!(fs::read(&record.path).unwrap(), b"identical payload");
    }
}

#[test]
fn test_delete_removes_every_copy() {
    let (tree, work, a, b) = two_copies();
    let groups = scan_to_groups(tree.path(), &work.path().join("duplicates.lst"));

    let (output, _) = resolve("d\n", &groups, work.path().join("dups.lst"));

    assert!(output.contains("Deleted 2 file(s)"));
    assert!(!a.exists());
    assert!(!b.exists());
}

#[test]
fn test_quit_changes_nothing() {
    let (tree, work, a, b) = two_copies();
    let list = work.path().join("duplicates.lst");
    let groups = scan_to_groups(tree.path(), &list);
    let before = fs::read(&list).unwrap();

    let (_, end) = resolve("q\n", &groups, work.path().join("dups.lst"));

    assert_eq!(end, SessionEnd::Quit);
    assert!(a.exists() && b.exists());
    assert_eq!(fs::read(&list).unwrap(), before);
    assert!(!work.path().join("dups.lst").exists());
}

#[test]
fn test_save_writes_remaining_groups() {
    let tree = tempdir().unwrap();
    let work = tempdir().unwrap();
    for (name, content) in [("a1", "aaaa"), ("a2", "aaaa"), ("b1", "bbbb"), ("b2", "bbbb")] {
        fs::write(tree.path().join(name), content).unwrap();
    }
    let groups = scan_to_groups(tree.path(), &work.path().join("duplicates.lst"));
    assert_eq!(groups.len(), 2);

    let save_to = work.path().join("dups.lst");
    let (_, end) = resolve("n\ns\n", &groups, save_to.clone());

    assert_eq!(
        end,
        SessionEnd::Saved {
            path: save_to.clone(),
            groups: 0
        }
    );
    assert!(read_list(&save_to).unwrap().is_empty());

    let (_, end) = resolve("s\n", &groups, save_to.clone());
    assert_eq!(
        end,
        SessionEnd::Saved {
            path: save_to.clone(),
            groups: 1
        }
    );
    assert_eq!(read_list(&save_to).unwrap(), groups[1]);
}

#[test]
fn test_prefix_policy_matches_full_fingerprint_on_real_list() {
    let tree = tempdir().unwrap();
    let work = tempdir().unwrap();
    for name in ["x", "y", "z"] {
        fs::write(tree.path().join(name), b"same").unwrap();
    }
    let list = work.path().join("duplicates.lst");
    let full = scan_to_groups(tree.path(), &list);
    let prefixed = split_groups(&read_list(&list).unwrap(), GroupingPolicy::Prefix(8));

    assert_eq!(full, prefixed);
    assert_eq!(full[0].len(), 3);
}
