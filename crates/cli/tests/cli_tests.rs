use assert_cmd::Command;
use predicates::prelude::*;

fn kaname() -> Command {
    let mut cmd = Command::cargo_bin("kaname").unwrap();
    cmd.env_remove("KANAME_CONFIG_DIR").env_remove("DATABASE_URL");
    cmd
}

#[test]
fn test_cli_help() {
    kaname()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Users CRUD backend and console"));
}

#[test]
fn test_cli_serve_help() {
    kaname().arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_cli_list_shows_commands() {
    kaname()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("tinker"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("config:types"));
}

#[test]
fn test_config_types_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config");
    std::fs::create_dir(&config).unwrap();
    std::fs::write(config.join("app.toml"), "name = \"kaname\"\nport = 3000\n").unwrap();
    let out = dir.path().join("generated/config.rs");

    kaname()
        .args(["--config", config.to_str().unwrap(), "config:types", "--out", out.to_str().unwrap()])
        .assert()
        .success();

    let generated = std::fs::read_to_string(&out).unwrap();
    assert!(generated.contains("pub struct AppConfig"));
    assert!(generated.contains("pub port: i64,"));
}

#[test]
fn test_config_types_invalid_toml_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.toml"), "port = = 1\n").unwrap();
    let out = dir.path().join("config.rs");

    kaname()
        .args(["config:types", "--dir", dir.path().to_str().unwrap(), "--out", out.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("app.toml"));
    assert!(!out.exists());
}

#[test]
fn test_config_types_missing_dir_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    kaname()
        .args(["config:types", "--dir", missing.to_str().unwrap(), "--out", dir.path().join("o.rs").to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config directory not found"));
}

#[test]
fn test_migrate_creates_sqlite_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("kaname.db");
    kaname()
        .env("KANAME_SQLITE_PATH", &db)
        .args(["--config", dir.path().join("none").to_str().unwrap(), "migrate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlite"));
    assert!(db.exists());
}
