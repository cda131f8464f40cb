//! Integration tests for `confr save`.

mod common;

use common::{TestEnv, shift_mtime};
use predicates::prelude::*;

#[test]
fn test_save_records_file() {
    let env = TestEnv::new();
    let path = env.write(".zshrc", "export EDITOR=vim\n");

    env.confr()
        .args(["save", "zshrc"])
        .arg(&path)
        .args(["linux", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved!"));

    let store = env.store();
    let record = &store["records"][0];
    assert_eq!(record["displayName"], "zshrc");
    assert_eq!(record["path"], path.to_str().unwrap());
    assert_eq!(record["tags"], serde_json::json!(["linux", "zsh"]));
    assert_eq!(record["content"], "export EDITOR=vim\n");
    assert!(record["permissionEncoding"].as_str().unwrap().contains(' '));
    assert!(record["lastModified"].is_string());
}

#[test]
fn test_save_relative_path_is_made_absolute() {
    let env = TestEnv::new();
    env.write("nested/app.conf", "key=value\n");

    env.confr()
        .args(["save", "app", "nested/app.conf"])
        .assert()
        .success();

    let path = env.store()["records"][0]["path"].as_str().unwrap().to_string();
    assert!(std::path::Path::new(&path).is_absolute());
    assert!(path.ends_with("app.conf"));
}

#[test]
fn test_save_unchanged_file_is_ignored() {
    let env = TestEnv::new();
    let path = env.write("vimrc", "set nu\n");

    env.confr().args(["save", "vimrc"]).arg(&path).assert().success();
    env.confr()
        .args(["save", "vimrc"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("File not changed. Ignoring"));

    assert_eq!(env.record_names(), vec!["vimrc"]);
}

#[test]
fn test_save_overwrite_moves_record_to_end() {
    let env = TestEnv::new();
    let first = env.write("first.conf", "one\n");
    let second = env.write("second.conf", "two\n");

    env.confr().args(["save", "first"]).arg(&first).assert().success();
    env.confr().args(["save", "second"]).arg(&second).assert().success();

    env.write("first.conf", "one, edited\n");
    shift_mtime(&first, 60);

    env.confr()
        .args(["save", "first"])
        .arg(&first)
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found the following:"))
        .stdout(predicate::str::contains("Overwrite? (y/n)"))
        .stdout(predicate::str::contains("Saved!"));

    assert_eq!(env.record_names(), vec!["second", "first"]);
    assert_eq!(env.store()["records"][1]["content"], "one, edited\n");
}

#[test]
fn test_save_name_and_path_matching_different_records() {
    let env = TestEnv::new();
    let a = env.write("a.conf", "a\n");
    let b = env.write("b.conf", "b\n");

    env.confr().args(["save", "a"]).arg(&a).assert().success();
    env.confr().args(["save", "b"]).arg(&b).assert().success();
    shift_mtime(&b, 60);

    env.confr()
        .args(["save", "a"])
        .arg(&b)
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved!"));

    let store = env.store();
    let records = store["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["displayName"], "a");
    assert_eq!(records[0]["path"], b.to_str().unwrap());
    assert_eq!(records[0]["content"], "b\n");
}

#[test]
fn test_save_overwrite_declined_keeps_store() {
    let env = TestEnv::new();
    let path = env.write("hosts", "127.0.0.1\n");

    env.confr().args(["save", "hosts"]).arg(&path).assert().success();
    env.write("hosts", "10.0.0.1\n");
    shift_mtime(&path, 60);

    env.confr()
        .args(["save", "hosts"])
        .arg(&path)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved!").not());

    assert_eq!(env.store()["records"][0]["content"], "127.0.0.1\n");
}

#[test]
fn test_save_missing_file_fails() {
    let env = TestEnv::new();

    env.confr()
        .args(["save", "ghost", "does-not-exist"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error while checking file"));
}

#[test]
fn test_save_directory_fails() {
    let env = TestEnv::new();
    std::fs::create_dir(env.path().join("dotfiles")).unwrap();

    env.confr()
        .args(["save", "dots", "dotfiles"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Directories are not implemented"));
}

#[test]
fn test_save_json_output() {
    let env = TestEnv::new();
    let path = env.write("gitconfig", "[user]\n");

    env.confr()
        .args(["--json", "save", "git"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""outcome":"saved""#));
}
