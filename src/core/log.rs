use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

const OP_WIDTH: usize = 60;

fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "clock_in" => Colour::Green,
        "clock_out" => Colour::Cyan,
        "edit" => Colour::Yellow,
        "del" => Colour::Red,
        "approved" => Colour::Green,
        "rejected" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("user_") || other.starts_with("settings_") => Colour::Blue,
        other if other.starts_with("overtime_") => Colour::Yellow,
        other if other.starts_with("location_") || other.starts_with("schedule_") => {
            Colour::Cyan
        }
        _ => Colour::White,
    }
}

struct LogEntry {
    id: i64,
    date: String,
    actor: Option<String>,
    operation: String,
    target: String,
    message: String,
}

pub struct LogLogic;

impl LogLogic {
    /// Print the audit trail, oldest first. `limit` keeps only the last N rows.
    pub fn print_log(pool: &mut DbPool, limit: Option<usize>) -> AppResult<()> {
        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;

        let mut stmt = pool.conn.prepare_cached(
            "SELECT l.id, l.date, u.personal_id, l.operation, l.target, l.message
             FROM log l
             LEFT JOIN users u ON u.id = l.actor
             ORDER BY l.id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                actor: row.get(2)?,
                operation: row.get(3)?,
                target: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                message: row.get(5)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        if let Some(n) = limit {
            let skip = entries.len().saturating_sub(n);
            entries.drain(..skip);
        }

        if entries.is_empty() {
            println!("⚠️  Log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);
        let actor_w = entries
            .iter()
            .map(|e| e.actor.as_deref().unwrap_or("system").len())
            .max()
            .unwrap_or(6);

        let lines: Vec<(LogEntry, String, usize)> = entries
            .into_iter()
            .map(|e| {
                let (shown, width) = Self::op_column(&ansi, &e);
                (e, shown, width)
            })
            .collect();
        let op_w = lines.iter().map(|(_, _, w)| *w).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (e, shown, width) in lines {
            let padding = " ".repeat(op_w.saturating_sub(width));
            println!(
                "{:>id_w$}: {:<date_w$} | {:<actor_w$} | {}{} => {}",
                e.id,
                e.date,
                e.actor.as_deref().unwrap_or("system"),
                shown,
                padding,
                e.message,
            );
        }

        Ok(())
    }

    /// Coloured "operation (target)" cell, truncated to `OP_WIDTH` visible
    /// characters, plus its visible width.
    fn op_column(ansi: &Regex, e: &LogEntry) -> (String, usize) {
        let color = color_for_operation(&e.operation);

        let cell = if e.target.is_empty() {
            color.paint(e.operation.as_str()).to_string()
        } else {
            format!("{} ({})", color.paint(e.operation.as_str()), e.target)
        };

        let visible = ansi.replace_all(&cell, "").into_owned();
        let width = visible.chars().count();
        if width <= OP_WIDTH {
            return (cell, width);
        }

        // only the operation word keeps its colour after the cut
        let cut: String = visible.chars().take(OP_WIDTH - 3).collect();
        let shown = match cut.split_once(' ') {
            Some((op, rest)) => format!("{} {}...", color.paint(op), rest),
            None => format!("{}...", color.paint(cut.as_str())),
        };
        (shown, OP_WIDTH)
    }
}
