#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const SEED_JSON: &str = r#"{
  "bins": [
    {"id": 120, "name": "Station", "fullness": 0.85, "location": "Via Roma 1",
     "historyData": [0.5, 0.7, 0.85], "timeLeft": "2h"},
    {"id": 1, "name": "Market Street", "fullness": 0.2, "weight": 12.5,
     "latitude": "41.9", "longitude": "12.5", "historyData": [10, 15, 20]},
    {"id": 12, "name": "Harbor", "fillLevel": 55,
     "location": {"latitude": 41.0, "longitude": 12.0}},
    {"id": 2, "fullness": 0.45},
    {"id": 21, "name": "Park", "fullness": 0.72},
    {"id": "bad", "fullness": 0.3}
  ],
  "users": [
    {"email": "ann@example.com", "employeeId": "E100", "role": "admin", "password": "secret1"},
    {"email": "dan@example.com", "employeeId": "D200", "role": "driver", "password": "secret2"},
    {"email": "bea@example.com", "employeeId": "B300", "password": "secret3"}
  ],
  "all_users": [
    {"email": "newbie@example.com", "role": "driver"}
  ]
}"#;

/// HOME points at a per-process temp dir so no real config is read.
pub fn es() -> Command {
    let home = env::temp_dir().join(format!("envirosage_home_{}", std::process::id()));
    fs::create_dir_all(&home).ok();

    let mut cmd = cargo_bin_cmd!("envirosage");
    cmd.env("HOME", home).env_remove("ENVIROSAGE_LOG").env_remove("RUST_LOG");
    cmd
}

pub struct TestPaths {
    pub db: String,
    pub session: String,
    pub seed: String,
}

impl TestPaths {
    /// `--db` and `--session` global arguments.
    pub fn globals(&self) -> Vec<&str> {
        vec!["--db", &self.db, "--session", &self.session]
    }
}

/// Unique paths inside the system temp dir; stale files are removed.
pub fn setup_test_paths(name: &str) -> TestPaths {
    let base: PathBuf = env::temp_dir();
    let db = base.join(format!("{name}_envirosage.sqlite"));
    let session = base.join(format!("{name}_session.json"));
    let seed = base.join(format!("{name}_seed.json"));

    fs::remove_file(&db).ok();
    fs::remove_file(&session).ok();
    fs::write(&seed, SEED_JSON).ok();

    TestPaths {
        db: db.to_string_lossy().to_string(),
        session: session.to_string_lossy().to_string(),
        seed: seed.to_string_lossy().to_string(),
    }
}

/// Create a unique output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let path = env::temp_dir().join(format!("{name}_out.{ext}"));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// init + seed.
pub fn init_seeded(paths: &TestPaths) {
    es().args(paths.globals())
        .args(["--test", "init"])
        .assert()
        .success();

    es().args(paths.globals())
        .args(["seed", "--file", &paths.seed])
        .assert()
        .success();
}

pub fn login(paths: &TestPaths, identifier: &str, password: &str) {
    es().args(paths.globals())
        .args(["login", identifier, "--password", password])
        .assert()
        .success();
}
