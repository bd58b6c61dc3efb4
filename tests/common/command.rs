use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_mingit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

/// Repository with `test.txt` = `Hello World\n` committed as `First!`
#[fixture]
pub fn committed_repository_dir(init_repository_dir: TempDir) -> TempDir {
    let file = FileSpec::new(
        init_repository_dir.path().join("test.txt"),
        "Hello World\n".to_string(),
    );
    write_file(file);

    run_mingit_command(init_repository_dir.path(), &["add", "test.txt"])
        .assert()
        .success();
    mingit_commit(init_repository_dir.path(), "First!")
        .assert()
        .success();

    init_repository_dir
}

pub fn run_mingit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("mingit").expect("Failed to find mingit binary");
    cmd.current_dir(dir)
        .args(args)
        .env_remove("MINGIT_LOG")
        .env("NO_COLOR", "1");
    cmd
}

pub fn mingit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_mingit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", "fake_user"),
        ("GIT_AUTHOR_EMAIL", "fake_email@email.com"),
        ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Stdout of a command that must succeed
pub fn stdout_of(mut cmd: Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("stdout is not UTF-8")
}

/// Digest the current branch points at, read straight from the ref files
pub fn get_head_commit_sha(dir: &Path) -> Option<String> {
    let head_content = std::fs::read_to_string(dir.join(".mingit").join("HEAD")).ok()?;

    match head_content.trim().strip_prefix("ref: ") {
        Some(ref_path) => {
            let commit_sha = std::fs::read_to_string(dir.join(".mingit").join(ref_path)).ok()?;
            Some(commit_sha.trim().to_string())
        }
        None => Some(head_content.trim().to_string()),
    }
}

/// Stage every listed path and commit, returning the new head digest
pub fn add_and_commit(dir: &Path, paths: &[&str], message: &str) -> String {
    for path in paths {
        run_mingit_command(dir, &["add", path]).assert().success();
    }
    mingit_commit(dir, message).assert().success();

    get_head_commit_sha(dir).expect("branch should point at a commit")
}
