//! End-to-end batches against real files in a temporary workspace.

use linepatch::{apply_request, ChangeRequest, EditError, EditRequest, FileStatus, LocalFs};
use std::fs;
use tempfile::TempDir;

fn workspace(files: &[(&str, &str)]) -> (TempDir, LocalFs) {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    let local = LocalFs::new(dir.path()).unwrap();
    (dir, local)
}

fn read(dir: &TempDir, path: &str) -> String {
    fs::read_to_string(dir.path().join(path)).unwrap()
}

#[test]
fn test_delete_then_insert_same_file() {
    let (dir, local) = workspace(&[("f.txt", "a\nb\nc")]);

    let request = EditRequest::new(vec![ChangeRequest::delete("f.txt", 2, "b")]);
    let results = apply_request(&request, &local).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, FileStatus::Success);
    assert_eq!(
        results[0].message.as_deref(),
        Some("File f.txt modified successfully.")
    );
    let diff = results[0].diff.as_deref().unwrap();
    assert!(diff.starts_with("--- f.txt\n+++ f.txt\n"));
    assert_eq!(linepatch::diff::line_stats(diff), (0, 1));
    assert_eq!(read(&dir, "f.txt"), "a\nc");

    fs::write(dir.path().join("f.txt"), "a\nb\nc").unwrap();
    let request = EditRequest::new(vec![ChangeRequest::insert("f.txt", 2, "x")]);
    apply_request(&request, &local).unwrap();
    assert_eq!(read(&dir, "f.txt"), "a\nx\nb\nc");
}

#[test]
fn test_changes_run_bottom_up() {
    let (dir, local) = workspace(&[("f.txt", "one\ntwo\nthree\n")]);
    let request = EditRequest::new(vec![
        ChangeRequest::replace("f.txt", 1, "one", "ONE\nONE AGAIN"),
        ChangeRequest::replace("f.txt", 3, "three", "THREE"),
    ]);

    let results = apply_request(&request, &local).unwrap();
    assert_eq!(results[0].status, FileStatus::Success);
    assert_eq!(read(&dir, "f.txt"), "ONE\nONE AGAIN\ntwo\nTHREE\n");
}

#[test]
fn test_bad_regex_fails_only_its_file() {
    let (dir, local) = workspace(&[("a.txt", "alpha\n"), ("b.txt", "beta\n")]);
    let request = EditRequest::new(vec![
        ChangeRequest::replace("a.txt", 1, "(alpha", "x").regex(),
        ChangeRequest::replace("b.txt", 1, "beta", "BETA"),
    ]);

    let results = apply_request(&request, &local).unwrap();
    assert_eq!(results[0].path, "a.txt");
    assert_eq!(results[0].status, FileStatus::Failed);
    assert!(results[0]
        .message
        .as_deref()
        .unwrap()
        .contains("Invalid regex pattern \"(alpha\" in a.txt"));
    assert_eq!(read(&dir, "a.txt"), "alpha\n");

    assert_eq!(results[1].status, FileStatus::Success);
    assert_eq!(read(&dir, "b.txt"), "BETA\n");
}

#[test]
fn test_dry_run_reports_same_diff_without_writing() {
    let files = [("src/lib.rs", "fn a() {\n    one();\n}\n")];
    let change = ChangeRequest::insert("src/lib.rs", 3, "two();");

    let (dry_dir, dry_fs) = workspace(&files);
    let dry = apply_request(
        &EditRequest::new(vec![change.clone()]).dry_run(true),
        &dry_fs,
    )
    .unwrap();
    assert_eq!(
        dry[0].message.as_deref(),
        Some("File src/lib.rs changes calculated (dry run).")
    );
    assert_eq!(read(&dry_dir, "src/lib.rs"), files[0].1);

    let (live_dir, live_fs) = workspace(&files);
    let live = apply_request(&EditRequest::new(vec![change]), &live_fs).unwrap();
    assert_eq!(dry[0].diff, live[0].diff);
    assert_eq!(
        read(&live_dir, "src/lib.rs"),
        "fn a() {\n    one();\n    two();\n}\n"
    );
}

#[test]
fn test_skipped_file_is_left_untouched() {
    let (dir, local) = workspace(&[("f.txt", "a\nb\n")]);
    let before = fs::metadata(dir.path().join("f.txt"))
        .unwrap()
        .modified()
        .unwrap();

    let request = EditRequest::new(vec![ChangeRequest::delete("f.txt", 1, "nothing here")]);
    let results = apply_request(&request, &local).unwrap();

    assert_eq!(results[0].status, FileStatus::Skipped);
    assert!(results[0]
        .message
        .as_deref()
        .unwrap()
        .starts_with("No applicable changes found or made for f.txt."));
    assert_eq!(read(&dir, "f.txt"), "a\nb\n");
    let after = fs::metadata(dir.path().join("f.txt"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_missing_and_escaping_paths_fail() {
    let (_dir, local) = workspace(&[("ok.txt", "a\n")]);
    let request = EditRequest::new(vec![
        ChangeRequest::insert("nope.txt", 1, "x"),
        ChangeRequest::insert("../outside.txt", 1, "x"),
        ChangeRequest::insert("ok.txt", 1, "x"),
    ]);

    let results = apply_request(&request, &local).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].message.as_deref(),
        Some("File not found: nope.txt")
    );
    assert_eq!(results[1].status, FileStatus::Failed);
    assert!(results[1]
        .message
        .as_deref()
        .unwrap()
        .starts_with("Invalid path ../outside.txt"));
    assert_eq!(results[2].status, FileStatus::Success);
}

#[test]
fn test_invalid_request_is_rejected_whole() {
    let (dir, local) = workspace(&[("f.txt", "a\n")]);
    let request = EditRequest::new(vec![
        ChangeRequest::insert("f.txt", 1, "x"),
        ChangeRequest::insert("f.txt", 1, "y").occurrence(0),
    ]);

    let err = apply_request(&request, &local).unwrap_err();
    assert!(matches!(err, EditError::InvalidInput(_)));
    assert_eq!(read(&dir, "f.txt"), "a\n");
}

#[test]
fn test_regex_ignores_anchor_but_plain_text_does_not() {
    let content = "target\nother\n";

    // Plain text scans from the anchor line, so the line above is out of reach.
    let (dir, local) = workspace(&[("f.txt", content)]);
    let request = EditRequest::new(vec![ChangeRequest::delete("f.txt", 2, "target")]);
    let results = apply_request(&request, &local).unwrap();
    assert_eq!(results[0].status, FileStatus::Skipped);
    assert_eq!(read(&dir, "f.txt"), content);

    // A regex searches the whole file regardless of the anchor.
    let request = EditRequest::new(vec![ChangeRequest::delete("f.txt", 2, "target\n").regex()]);
    let results = apply_request(&request, &local).unwrap();
    assert_eq!(results[0].status, FileStatus::Success);
    assert_eq!(read(&dir, "f.txt"), "other\n");
}

#[test]
fn test_occurrence_selects_nth_match() {
    let (dir, local) = workspace(&[("f.txt", "x = 1\nx = 1\nx = 1\n")]);
    let request = EditRequest::new(vec![
        ChangeRequest::replace("f.txt", 1, "x = 1", "x = 2").occurrence(2)
    ]);

    apply_request(&request, &local).unwrap();
    assert_eq!(read(&dir, "f.txt"), "x = 1\nx = 2\nx = 1\n");
}

#[test]
fn test_insert_past_end_appends() {
    let (dir, local) = workspace(&[("f.txt", "a\nb")]);
    let request = EditRequest::new(vec![ChangeRequest::insert("f.txt", 99, "tail")]);

    apply_request(&request, &local).unwrap();
    assert_eq!(read(&dir, "f.txt"), "a\nb\ntail");
}

#[test]
fn test_overlapping_changes_skip_the_later_one() {
    let (dir, local) = workspace(&[("f.txt", "a\nb\nc\n")]);
    let request = EditRequest::new(vec![
        ChangeRequest::replace("f.txt", 2, "b", "B1\nB2"),
        // Runs after the line-2 change (lower anchor) and lands inside it.
        ChangeRequest::delete("f.txt", 1, "B2").regex(),
    ]);

    let results = apply_request(&request, &local).unwrap();
    assert_eq!(results[0].status, FileStatus::Success);
    assert!(results[0].message.as_deref().unwrap().contains("overlaps"));
    assert_eq!(read(&dir, "f.txt"), "a\nB1\nB2\nc\n");
}

#[test]
fn test_empty_pattern_is_skipped_without_blocking_batch() {
    let (dir, local) = workspace(&[("a.txt", "a\n"), ("b.txt", "a\nb\n")]);
    let request = EditRequest::new(vec![
        ChangeRequest::delete("a.txt", 1, ""),
        ChangeRequest::delete("b.txt", 1, "b"),
    ]);

    let results = apply_request(&request, &local).unwrap();
    assert_eq!(results[0].status, FileStatus::Skipped);
    assert_eq!(read(&dir, "a.txt"), "a\n");
    assert_eq!(results[1].status, FileStatus::Success);
    assert_eq!(read(&dir, "b.txt"), "a\n");
}
