use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result, params};

/// One schema step. Applied at most once, bookkept in the `log` table
/// as a `migration_applied` row whose target is the version string.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_users",
        description: "Created users table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            email        TEXT NOT NULL UNIQUE,
            personal_id  TEXT NOT NULL UNIQUE,
            role         TEXT NOT NULL DEFAULT 'employee'
                         CHECK(role IN ('employee','manager','admin')),
            created_at   TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250301_0002_create_locations",
        description: "Created locations table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS locations (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            address    TEXT,
            latitude   REAL,
            longitude  REAL
        );
        "#,
    },
    Migration {
        version: "20250301_0003_create_time_registrations",
        description: "Created time_registrations table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS time_registrations (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date           TEXT NOT NULL,
            clock_in       TEXT NOT NULL,
            clock_out      TEXT,
            total_hours    REAL,
            latitude       REAL,
            longitude      REAL,
            latitude_end   REAL,
            longitude_end  REAL,
            notes          TEXT,
            status         TEXT NOT NULL DEFAULT 'pending'
                           CHECK(status IN ('pending','approved','rejected')),
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_registrations_user_date
            ON time_registrations(user_id, date);
        "#,
    },
    Migration {
        version: "20250301_0004_create_schedules",
        description: "Created schedules table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS schedules (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date          TEXT NOT NULL,
            start_time    TEXT NOT NULL,
            end_time      TEXT NOT NULL,
            total_hours   REAL NOT NULL,
            location_id   INTEGER REFERENCES locations(id) ON DELETE SET NULL,
            recurrence    TEXT CHECK(recurrence IN ('daily','weekly','monthly'))
        );

        CREATE INDEX IF NOT EXISTS idx_schedules_user_date ON schedules(user_id, date);
        "#,
    },
    Migration {
        version: "20250412_0005_single_open_registration",
        description: "Only one open registration per user and day",
        sql: r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_registrations_one_open
            ON time_registrations(user_id, date)
            WHERE clock_out IS NULL;
        "#,
    },
    Migration {
        version: "20250501_0006_create_overtime_rules",
        description: "Created overtime_rules table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS overtime_rules (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            type         TEXT NOT NULL
                         CHECK(type IN ('weekday_evening','weekend','holiday','night_shift')),
            multiplier   REAL NOT NULL CHECK(multiplier >= 1),
            description  TEXT,
            is_active    INTEGER NOT NULL DEFAULT 1,
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250501_0007_create_user_settings",
        description: "Created user_settings table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS user_settings (
            user_id               INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            enable_notifications  INTEGER NOT NULL DEFAULT 1,
            auto_clock_out        INTEGER NOT NULL DEFAULT 0,
            default_view          TEXT NOT NULL DEFAULT 'dashboard'
                                  CHECK(default_view IN ('dashboard','time-registrations','reports')),
            time_format           TEXT NOT NULL DEFAULT '24h'
                                  CHECK(time_format IN ('12h','24h'))
        );
        "#,
    },
];

/// Ensure that the `log` table exists; it also stores the migration history.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            actor     INTEGER,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![m.version, m.description],
    )?;
    tx.commit()?;

    success(format!("Migration applied: {} → {}", m.version, m.description));
    Ok(())
}

/// Versions not yet recorded in the log table, in application order.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Called by db::initialize::init_db() and `db --migrate`.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied += 1;
    }

    Ok(applied)
}
