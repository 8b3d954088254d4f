//! End-to-end tests for the `sw` binary against file-backed databases.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// ── Helpers ────────────────────────────────────────────────────────────

const ENV_VARS: [&str; 6] = [
    "RUST_LOG",
    "SW_ENGINE",
    "SW_DSN",
    "SW_STATE_TABLE",
    "SW_MIGRATIONS",
    "SW_RUN_IN_TRANSACTION",
];

fn sw_bin() -> String {
    env!("CARGO_BIN_EXE_sw").to_string()
}

/// A temp project directory with a `migrations/` folder.
struct Project {
    dir: TempDir,
}

impl Project {
    fn new(migrations: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let migrations_dir = dir.path().join("migrations");
        fs::create_dir(&migrations_dir).unwrap();
        for (name, sql) in migrations {
            fs::write(migrations_dir.join(name), sql).unwrap();
        }
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run `sw` with no connection flags.
    fn bare(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(sw_bin());
        cmd.current_dir(self.path()).args(args);
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.output()
            .unwrap_or_else(|e| panic!("Failed to run sw {args:?}: {e}"))
    }

    /// Run `sw` against the project's DuckDB file.
    fn sw(&self, args: &[&str]) -> Output {
        let mut full = vec![
            "-e",
            "duckdb",
            "-d",
            "state.duckdb",
            "-s",
            "stepwise_state",
            "-m",
            "migrations",
        ];
        full.extend_from_slice(args);
        self.bare(&full)
    }

    fn status(&self) -> String {
        let output = self.sw(&["status"]);
        assert!(output.status.success(), "status failed: {}", stderr(&output));
        stdout(&output)
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "expected success, stderr: {}",
        stderr(output)
    );
}

fn three_migrations() -> Project {
    Project::new(&[
        ("1_users.sql", "CREATE TABLE users (id INTEGER);"),
        ("2_orders.sql", "CREATE TABLE orders (id INTEGER);"),
        ("10_seed.sql", "INSERT INTO users VALUES (1), (2);"),
    ])
}

fn failing_second() -> Project {
    Project::new(&[
        ("1_a.sql", "CREATE TABLE a (id INTEGER);"),
        ("2_b.sql", "CREATE TABLE b (id INTEGER); THIS IS NOT SQL;"),
        ("3_c.sql", "CREATE TABLE c (id INTEGER);"),
    ])
}

// ── validate ───────────────────────────────────────────────────────────

#[test]
fn test_validate_counts_migrations() {
    let project = three_migrations();
    let output = project.bare(&["validate", "-m", "migrations"]);
    assert_ok(&output);
    assert_eq!(stdout(&output), "3 migrations OK\n");
}

#[test]
fn test_validate_verbose_lists_each_migration() {
    let project = three_migrations();
    let output = project.bare(&["validate", "-m", "migrations", "-v"]);
    assert_ok(&output);
    let log = stderr(&output);
    assert!(log.contains("2_orders.sql (version 2"), "{log}");
    assert!(log.contains("10_seed.sql (version 10"), "{log}");
}

#[test]
fn test_validate_rejects_bad_name() {
    let project = Project::new(&[("1_a.sql", ""), ("create_b.sql", "")]);
    let output = project.bare(&["validate", "-m", "migrations"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("create_b.sql"));
}

#[test]
fn test_validate_rejects_duplicate_version() {
    let project = Project::new(&[("1_a.sql", ""), ("001_b.sql", "")]);
    let output = project.bare(&["validate", "-m", "migrations"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("001_b.sql") && err.contains("1_a.sql"), "{err}");
}

#[test]
fn test_migrations_flag_required() {
    let project = three_migrations();
    let output = project.bare(&["validate"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--migrations"));
}

// ── init / status / reset ──────────────────────────────────────────────

#[test]
fn test_init_then_status() {
    let project = three_migrations();
    let output = project.sw(&["init"]);
    assert_ok(&output);
    assert_eq!(stdout(&output), "");
    assert_eq!(project.status(), "0\n");
}

#[test]
fn test_init_twice_fails() {
    let project = three_migrations();
    assert_ok(&project.sw(&["init"]));
    let output = project.sw(&["init"]);
    assert!(!output.status.success());
    assert_eq!(project.status(), "0\n");
}

#[test]
fn test_status_before_init_fails() {
    let project = three_migrations();
    let output = project.sw(&["status"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("stepwise_state"));
}

#[test]
fn test_status_json() {
    let project = three_migrations();
    assert_ok(&project.sw(&["init"]));
    assert_ok(&project.sw(&["reset", "7", "--dirty"]));

    let output = project.sw(&["status", "-o", "json"]);
    assert_ok(&output);
    let json: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(json["version"], 7);
    assert_eq!(json["dirty"], true);
}

#[test]
fn test_reset_overwrites_state() {
    let project = three_migrations();
    assert_ok(&project.sw(&["init"]));

    assert_ok(&project.sw(&["reset", "5", "--dirty"]));
    assert_eq!(project.status(), "5 (dirty)\n");

    assert_ok(&project.sw(&["reset", "2"]));
    assert_eq!(project.status(), "2\n");
}

#[test]
fn test_missing_dsn_fails_before_connecting() {
    let project = three_migrations();
    let output = project.bare(&["-e", "duckdb", "-s", "s", "-m", "migrations", "init"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--dsn"));
    assert!(!project.path().join("state.duckdb").exists());
}

#[test]
fn test_server_engine_reports_connection_failure() {
    let project = three_migrations();
    for (engine, dsn) in [("postgres", "definitely not a dsn"), ("mysql", "not a url")] {
        let output = project.bare(&[
            "-e",
            engine,
            "-d",
            dsn,
            "-s",
            "s",
            "-m",
            "migrations",
            "status",
        ]);
        assert!(!output.status.success(), "{engine} should fail");
        assert!(stderr(&output).contains("D001"), "{engine}: {}", stderr(&output));
    }
}

// ── migrate ────────────────────────────────────────────────────────────

#[test]
fn test_migrate_dry_run_lists_pending() {
    let project = three_migrations();
    assert_ok(&project.sw(&["init"]));
    assert_ok(&project.sw(&["reset", "1"]));

    let output = project.sw(&["migrate"]);
    assert_ok(&output);
    assert!(stderr(&output)
        .contains("running in dry-run mode because '--force' was not provided"));
    assert_eq!(stdout(&output), "2_orders.sql\n10_seed.sql\n");
    assert_eq!(project.status(), "1\n");
}

#[test]
fn test_migrate_force_applies_in_order() {
    let project = three_migrations();
    assert_ok(&project.sw(&["init"]));

    let output = project.sw(&["migrate", "--force"]);
    assert_ok(&output);
    assert!(!stderr(&output).contains("dry-run"));
    assert_eq!(stdout(&output), "1_users.sql\n2_orders.sql\n10_seed.sql\n");
    assert_eq!(project.status(), "10\n");

    let again = project.sw(&["migrate", "-f"]);
    assert_ok(&again);
    assert_eq!(stdout(&again), "");
    assert_eq!(project.status(), "10\n");
}

#[test]
fn test_migrate_refuses_dirty_state() {
    let project = three_migrations();
    assert_ok(&project.sw(&["init"]));
    assert_ok(&project.sw(&["reset", "1", "--dirty"]));

    let output = project.sw(&["migrate", "--force"]);
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("dirty"));
    assert_eq!(project.status(), "1 (dirty)\n");
}

#[test]
fn test_failure_without_transaction_leaves_dirty() {
    let project = failing_second();
    assert_ok(&project.sw(&["init"]));

    let output = project.sw(&["-t", "never", "migrate", "--force"]);
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "1_a.sql\n2_b.sql\n");
    assert!(stderr(&output).contains("\"2_b.sql\" (version 2) after 1 succeeded"));
    assert_eq!(project.status(), "1 (dirty)\n");
}

#[test]
fn test_failure_in_transaction_rolls_back() {
    let project = failing_second();
    assert_ok(&project.sw(&["init"]));

    let output = project.sw(&["-t", "always", "migrate", "--force"]);
    assert!(!output.status.success());
    assert_eq!(project.status(), "0\n");

    // Fix the broken migration and rerun from a clean slate
    fs::write(
        project.path().join("migrations").join("2_b.sql"),
        "CREATE TABLE b (id INTEGER);",
    )
    .unwrap();
    assert_ok(&project.sw(&["migrate", "--force"]));
    assert_eq!(project.status(), "3\n");
}

#[test]
fn test_migrate_with_bad_migrations_dir_does_not_touch_state() {
    let project = Project::new(&[("1_a.sql", ""), ("0_zero.sql", "")]);
    assert_ok(&project.sw(&["init"]));
    let output = project.sw(&["migrate", "--force"]);
    assert!(!output.status.success());
    assert_eq!(project.status(), "0\n");
}

// ── configuration sources ──────────────────────────────────────────────

#[test]
fn test_config_file_supplies_settings() {
    let project = three_migrations();
    fs::write(
        project.path().join("stepwise.yml"),
        "engine: sqlite\ndsn: app.db\nstate_table: schema_state\nmigrations: migrations\n",
    )
    .unwrap();

    assert_ok(&project.bare(&["init"]));
    let output = project.bare(&["migrate", "--force"]);
    assert_ok(&output);
    assert_eq!(stdout(&output), "1_users.sql\n2_orders.sql\n10_seed.sql\n");
    assert!(project.path().join("app.db").exists());

    let status = project.bare(&["status"]);
    assert_ok(&status);
    assert_eq!(stdout(&status), "10\n");
}

#[test]
fn test_explicit_config_path() {
    let project = three_migrations();
    fs::write(
        project.path().join("custom.yaml"),
        "engine: duckdb\ndsn: custom.duckdb\nstate_table: s\nmigrations: migrations\n",
    )
    .unwrap();

    assert_ok(&project.bare(&["-c", "custom.yaml", "init"]));
    let status = project.bare(&["-c", "custom.yaml", "status"]);
    assert_ok(&status);
    assert_eq!(stdout(&status), "0\n");
    assert!(project.path().join("custom.duckdb").exists());
}

#[test]
fn test_config_paths_relative_to_config_dir() {
    let project = three_migrations();
    let conf = project.path().join("conf");
    fs::create_dir(&conf).unwrap();
    fs::write(
        conf.join("stepwise.yml"),
        "engine: duckdb\ndsn: state.duckdb\nstate_table: s\nmigrations: ../migrations\n",
    )
    .unwrap();

    assert_ok(&project.bare(&["-c", "conf/stepwise.yml", "init"]));
    let output = project.bare(&["-c", "conf/stepwise.yml", "migrate", "-f"]);
    assert_ok(&output);
    assert_eq!(stdout(&output), "1_users.sql\n2_orders.sql\n10_seed.sql\n");
    assert!(conf.join("state.duckdb").exists());
    assert!(!project.path().join("state.duckdb").exists());
}

#[test]
fn test_environment_variables() {
    let project = three_migrations();
    let run = |args: &[&str]| {
        Command::new(sw_bin())
            .current_dir(project.path())
            .env("SW_ENGINE", "duckdb")
            .env("SW_DSN", "env.duckdb")
            .env("SW_STATE_TABLE", "env_state")
            .env("SW_MIGRATIONS", "migrations")
            .env("SW_RUN_IN_TRANSACTION", "always")
            .args(args)
            .output()
            .unwrap()
    };

    assert_ok(&run(&["init"]));
    assert_ok(&run(&["migrate", "-f"]));
    let status = run(&["status"]);
    assert_ok(&status);
    assert_eq!(stdout(&status), "10\n");

    // Flags win over the environment
    let other = run(&["-d", "other.duckdb", "status"]);
    assert!(!other.status.success());
}
