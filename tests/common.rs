#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveTime};
use std::env;
use std::fs;
use std::path::PathBuf;
use timereg::auth::AuthContext;
use timereg::db::initialize::init_db;
use timereg::db::pool::DbPool;
use timereg::db::queries::users::insert_user;
use timereg::models::registration::TimeRegistration;
use timereg::models::role::Role;

pub fn rti() -> Command {
    cargo_bin_cmd!("timereg")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timereg.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// `init` a fresh DB and bootstrap an admin (`adm`), a manager (`mgr`)
/// and two employees (`emp1`, `emp2`).
pub fn init_db_with_users(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rti()
        .args([
            "--db", db_path, "user", "add", "--name", "Ada Admin", "--email", "ada@example.com",
            "--pid", "adm", "--role", "admin",
        ])
        .assert()
        .success();

    for (name, email, pid, role) in [
        ("Mario Manager", "mario@example.com", "mgr", "manager"),
        ("Erin Employee", "erin@example.com", "emp1", "employee"),
        ("Eli Employee", "eli@example.com", "emp2", "employee"),
    ] {
        rti()
            .args([
                "--db", db_path, "--as", "adm", "user", "add", "--name", name, "--email", email,
                "--pid", pid, "--role", role,
            ])
            .assert()
            .success();
    }
}

/// In-memory database with the full schema, for library-level tests.
pub fn memory_pool() -> DbPool {
    let pool = DbPool::new(":memory:").expect("open in-memory db");
    init_db(&pool.conn).expect("init db");
    pool
}

pub fn add_user(pool: &DbPool, pid: &str, role: Role) -> AuthContext {
    let user = insert_user(
        &pool.conn,
        pid,
        &format!("{}@example.com", pid),
        pid,
        role,
    )
    .expect("insert user");
    AuthContext::for_user(&user)
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn t(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").expect("valid time")
}

/// Registration fixture with an explicit id, as if loaded from storage.
pub fn reg(id: i64, clock_in: &str, clock_out: Option<&str>) -> TimeRegistration {
    let mut r = TimeRegistration::new(1, d("2025-03-10"), t(clock_in), clock_out.map(t));
    r.id = id;
    r
}
