// CLI smoke tests: argument parsing, offline commands, and completions.
// Nothing here touches the network; networked behavior is covered by the
// core and api crate tests against wiremock.

use assert_cmd::Command;
use predicates::prelude::*;

fn pokedex() -> Command {
    Command::cargo_bin("pokedex").expect("binary should build")
}

#[test]
fn help_lists_subcommands() {
    pokedex()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pokemon"))
        .stdout(predicate::str::contains("items"))
        .stdout(predicate::str::contains("filter"))
        .stdout(predicate::str::contains("favorites"))
        .stdout(predicate::str::contains("teams"));
}

#[test]
fn no_args_shows_usage() {
    pokedex()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn config_path_prints_a_toml_path() {
    pokedex()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn completions_generate() {
    pokedex()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pokedex"));
}

#[test]
fn teams_lifecycle_works_offline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().to_str().expect("utf-8 path");

    pokedex()
        .args(["--data-dir", data_dir, "teams", "create", "Alpha"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Created team 'Alpha'"));

    pokedex()
        .args(["--data-dir", data_dir, "-o", "plain", "teams", "list"])
        .assert()
        .success();

    // Duplicate name is a conflict, exit code 6.
    pokedex()
        .args(["--data-dir", data_dir, "teams", "create", "Alpha"])
        .assert()
        .failure()
        .code(6);

    pokedex()
        .args(["--data-dir", data_dir, "-y", "teams", "delete", "Alpha"])
        .assert()
        .success();
}

#[test]
fn favorites_add_and_remove_work_offline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().to_str().expect("utf-8 path");

    pokedex()
        .args(["--data-dir", data_dir, "favorites", "add", "25"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Added #25"));

    pokedex()
        .args(["--data-dir", data_dir, "favorites", "add", "25"])
        .assert()
        .success()
        .stderr(predicate::str::contains("already a favorite"));

    pokedex()
        .args(["--data-dir", data_dir, "favorites", "remove", "25"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed #25"));
}

#[test]
fn unknown_team_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().to_str().expect("utf-8 path");

    pokedex()
        .args(["--data-dir", data_dir, "teams", "show", "Ghost"])
        .assert()
        .failure()
        .code(4);
}
