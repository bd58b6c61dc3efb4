use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::command::{
    add_and_commit, committed_repository_dir, get_head_commit_sha, init_repository_dir,
    mingit_commit, run_mingit_command, stdout_of,
};
use common::{HELLO_BLOB, HELLO_TREE};
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use rstest::rstest;

mod common;

fn cat_file(dir: &TempDir, sha: &str) -> String {
    stdout_of(run_mingit_command(dir.path(), &["cat-file", sha]))
}

#[rstest]
fn first_commit_stores_tree_and_moves_branch(committed_repository_dir: TempDir) {
    let commit_sha = get_head_commit_sha(committed_repository_dir.path()).unwrap();

    let commit = cat_file(&committed_repository_dir, &commit_sha);
    assert!(commit.starts_with(&format!("tree {HELLO_TREE}\nauthor fake_user")));
    assert!(!commit.contains("parent "));
    assert!(commit.ends_with("\n\nFirst!\n"));

    assert_eq!(
        cat_file(&committed_repository_dir, HELLO_TREE),
        format!("100644 blob {HELLO_BLOB}\ttest.txt\n")
    );
    committed_repository_dir
        .child(".mingit/refs/heads/main")
        .assert(format!("{commit_sha}\n"));
    committed_repository_dir.child(".mingit/index").assert("");
}

#[rstest]
fn commit_reports_branch_and_root_commit(init_repository_dir: TempDir) {
    init_repository_dir.child("a.txt").write_str("a").unwrap();
    run_mingit_command(init_repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    let stdout = stdout_of(mingit_commit(init_repository_dir.path(), "Initial\n\nbody"));
    let short = &get_head_commit_sha(init_repository_dir.path()).unwrap()[..7];

    assert_eq!(stdout, format!("[main (root-commit) {short}] Initial\n"));
}

#[rstest]
fn second_commit_links_parent_and_keeps_unstaged_paths(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    let first = get_head_commit_sha(dir).unwrap();
    committed_repository_dir.child("test.txt").write_str("Updated\n").unwrap();
    committed_repository_dir.child("docs/notes.md").write_str("notes").unwrap();

    let second = add_and_commit(dir, &["test.txt"], "Update");

    let commit = cat_file(&committed_repository_dir, &second);
    assert!(commit.contains(&format!("\nparent {first}\n")));
    let tree = commit.lines().next().unwrap().strip_prefix("tree ").unwrap();
    let listing = stdout_of(run_mingit_command(dir, &["ls-tree", tree]));
    assert_eq!(listing.lines().count(), 1);
    assert!(listing.ends_with("\ttest.txt\n"));
    assert!(!listing.contains(HELLO_BLOB));
}

#[rstest]
fn files_deleted_from_disk_stay_committed(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    std::fs::remove_file(committed_repository_dir.child("test.txt").path()).unwrap();
    committed_repository_dir.child("other.txt").write_str("other").unwrap();

    let commit = add_and_commit(dir, &["other.txt"], "Add other");

    let listing = stdout_of(run_mingit_command(dir, &["ls-tree", &commit]));
    assert!(listing.contains(&format!("{HELLO_BLOB}\ttest.txt")));
    assert!(listing.contains("\tother.txt"));
}

#[rstest]
fn commit_with_empty_index_fails_as_user_error(committed_repository_dir: TempDir) {
    let before = get_head_commit_sha(committed_repository_dir.path());

    mingit_commit(committed_repository_dir.path(), "Nothing")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("nothing staged"));

    assert_eq!(get_head_commit_sha(committed_repository_dir.path()), before);
}

#[rstest]
fn commit_without_message_reads_stdin(init_repository_dir: TempDir) {
    init_repository_dir.child("a.txt").write_str("a").unwrap();
    run_mingit_command(init_repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    run_mingit_command(init_repository_dir.path(), &["commit"])
        .write_stdin("From stdin\n")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("] From stdin\n"));

    let head = get_head_commit_sha(init_repository_dir.path()).unwrap();
    assert!(cat_file(&init_repository_dir, &head).ends_with("\n\nFrom stdin\n"));
}

#[rstest]
fn message_whitespace_is_kept_verbatim(repository_dir_pair: (TempDir, TempDir)) {
    let [padded, plain] = [(&repository_dir_pair.0, "  Padded  "), (&repository_dir_pair.1, "Padded")]
        .map(|(dir, message)| {
            run_mingit_command(dir.path(), &["init"]).assert().success();
            dir.child("same.txt").write_str("same").unwrap();
            add_and_commit(dir.path(), &["same.txt"], message)
        });

    assert_ne!(padded, plain);
    assert!(cat_file(&repository_dir_pair.0, &padded).ends_with("\n\n  Padded  \n"));
}

#[rstest]
fn same_snapshot_and_identity_give_same_commit_digest(repository_dir_pair: (TempDir, TempDir)) {
    let digests = [&repository_dir_pair.0, &repository_dir_pair.1].map(|dir| {
        run_mingit_command(dir.path(), &["init"]).assert().success();
        dir.child("same.txt").write_str("same").unwrap();
        add_and_commit(dir.path(), &["same.txt"], "Same")
    });

    assert_eq!(digests[0], digests[1]);
}

#[rstest::fixture]
fn repository_dir_pair() -> (TempDir, TempDir) {
    (TempDir::new().unwrap(), TempDir::new().unwrap())
}
