use filedups::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use filedups::scanner::NamePatterns;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;

fn write_file(path: PathBuf, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let outcome = finder.find_duplicates(dir.path()).unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.summary.files_listed, 0);
    assert_eq!(outcome.summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path().join("a.txt"), b"content a");
    write_file(dir.path().join("b.txt"), b"content b");
    write_file(dir.path().join("c.txt"), b"content c");

    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.summary.files_listed, 3);
    // Same size, so all three reach the hasher.
    assert_eq!(outcome.summary.files_hashed, 3);
    assert_eq!(outcome.summary.duplicate_groups, 0);
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path().join("a.txt"), b"duplicate");
    write_file(dir.path().join("b.txt"), b"duplicate");
    write_file(dir.path().join("c.txt"), b"unique");

    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let groups = outcome.groups();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[0].size(), 9);
    assert_eq!(outcome.summary.files_listed, 3);
    assert_eq!(outcome.summary.after_size, 2);
    assert_eq!(outcome.summary.duplicate_files, 2);
    assert_eq!(outcome.summary.reclaimable_space, 9);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("one").join("two");
    fs::create_dir_all(&deep).unwrap();
    write_file(dir.path().join("top.bin"), b"nested content");
    write_file(deep.join("bottom.bin"), b"nested content");

    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let groups = outcome.groups();

    assert_eq!(groups.len(), 1);
    let paths = groups[0].paths(&outcome.arena);
    assert!(paths.iter().any(|p| p.ends_with("one/two/bottom.bin")));
    assert!(paths.iter().any(|p| p.ends_with("top.bin")));
}

#[test]
fn test_scan_multiple_groups_sorted_by_fingerprint() {
    let dir = tempdir().unwrap();
    for name in ["x1", "x2", "x3"] {
        write_file(dir.path().join(name), b"xxxx");
    }
    for name in ["y1", "y2"] {
        write_file(dir.path().join(name), b"yyyy");
    }

    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let groups = outcome.groups();

    assert_eq!(groups.len(), 2);
    assert!(groups[0].fingerprint <= groups[1].fingerprint);
    let mut sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, 3]);
    assert_eq!(outcome.summary.duplicate_files, 5);
}

#[test]
fn test_scan_multiple_roots_share_candidates() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    write_file(left.path().join("photo.jpg"), b"same picture bytes");
    write_file(right.path().join("copy.jpg"), b"same picture bytes");

    let roots = vec![left.path().to_path_buf(), right.path().to_path_buf()];
    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&roots)
        .unwrap();

    assert_eq!(outcome.summary.roots.len(), 2);
    assert_eq!(outcome.summary.roots[0], left.path().canonicalize().unwrap());
    assert_eq!(outcome.groups().len(), 1);
}

#[test]
fn test_scan_rejects_missing_root_before_walking() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let roots = vec![dir.path().to_path_buf(), missing.clone()];

    let err = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&roots)
        .unwrap_err();

    match err {
        FinderError::NotADirectory(path) => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_scan_rejects_file_root() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    write_file(file.clone(), b"x");

    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&file)
        .unwrap_err();

    assert_eq!(err.to_string(), format!("Not a directory: {}", file.display()));
}

#[test]
fn test_scan_with_exclude_patterns() {
    let dir = tempdir().unwrap();
    let skipped = dir.path().join("node_modules");
    fs::create_dir(&skipped).unwrap();
    write_file(dir.path().join("keep.js"), b"module.exports = 1;");
    write_file(skipped.join("dep.js"), b"module.exports = 1;");

    let rule = NamePatterns::new(["^node_modules$"]).unwrap();
    let config = FinderConfig::default().with_exclude_rule(Arc::new(rule));
    let outcome = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(outcome.summary.files_listed, 1);
    assert!(outcome.records.is_empty());
}

#[test]
fn test_scan_tiny_arena_grows() {
    let dir = tempdir().unwrap();
    for i in 0..200 {
        write_file(
            dir.path().join(format!("a_rather_long_file_name_number_{i:04}.dat")),
            format!("{}", i % 50).as_bytes(),
        );
    }

    let config = FinderConfig::default().with_arena_sizes(4096, 4096);
    let outcome = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(outcome.summary.files_listed, 200);
    assert!(outcome.summary.arena_growths > 0);
    // 50 distinct contents, four copies each.
    assert_eq!(outcome.groups().len(), 50);
    for group in outcome.groups() {
        assert_eq!(group.len(), 4);
        for path in group.paths(&outcome.arena) {
            assert!(path.exists(), "{} must resolve after growth", path.display());
        }
    }
}

#[cfg(unix)]
#[test]
fn test_scan_ignores_symlinks() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.txt");
    write_file(target.clone(), b"linked content");
    std::os::unix::fs::symlink(&target, dir.path().join("alias.txt")).unwrap();

    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(outcome.summary.files_listed, 1);
    assert!(outcome.records.is_empty());
}

#[cfg(unix)]
#[test]
fn test_scan_hard_links_keep_one_alias() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("a");
    write_file(original.clone(), b"payload!");
    fs::hard_link(&original, dir.path().join("b")).unwrap();
    write_file(dir.path().join("c"), b"payload!");

    let outcome = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let groups = outcome.groups();

    assert_eq!(outcome.summary.after_size, 3);
    assert_eq!(outcome.summary.after_links, 2);
    assert_eq!(groups.len(), 1);
    let paths = groups[0].paths(&outcome.arena);
    assert_eq!(paths.len(), 2);
    // Lowest path bytes represent the shared inode.
    assert!(paths.iter().any(|p| p.ends_with("a")));
    assert!(paths.iter().any(|p| p.ends_with("c")));
}
