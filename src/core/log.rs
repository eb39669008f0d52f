use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;

const MAX_OP_WIDTH: usize = 60;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// ANSI colour for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "session_start" => Colour::Cyan,
        "session_complete" => Colour::Green,
        "settings_update" => Colour::Yellow,
        "reminder_on" => Colour::Blue,
        "reminder_off" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Render the audit table as printable lines.
    pub fn render_log(pool: &mut DbPool) -> AppResult<Vec<String>> {
        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| crate::errors::AppError::Other(e.to_string()))?;

        let entries: Vec<(i64, String, String, String, String)> = load_log(&pool.conn)?
            .into_iter()
            .map(|(id, raw_date, operation, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);

                // single op+target column
                let op_target = if target.is_empty() {
                    operation.clone()
                } else {
                    format!("{operation} ({target})")
                };

                (id, date, operation, op_target, message)
            })
            .collect();

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let op_w = entries
            .iter()
            .map(|(_, _, _, op_target, _)| op_target.len())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = entries
            .iter()
            .map(|(id, _, _, _, _)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, _, _, _)| date.len())
            .max()
            .unwrap_or(10);

        let mut lines = Vec::with_capacity(entries.len());

        for (id, date, operation_raw, op_target, message) in entries {
            let color = color_for_operation(&operation_raw);

            // truncate on visible characters only
            let visible = strip_ansi(&ansi, &op_target);
            let truncated = if visible.chars().count() > MAX_OP_WIDTH {
                let mut s = visible.chars().take(MAX_OP_WIDTH - 3).collect::<String>();
                s.push_str("...");
                s
            } else {
                visible
            };

            // only the operation word is coloured
            let recolored = match truncated.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(truncated.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&ansi, &recolored).chars().count()));

            lines.push(format!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                recolored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            ));
        }

        Ok(lines)
    }

    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let lines = Self::render_log(pool)?;

        println!("📜 Internal log:\n");
        for line in lines {
            println!("{}", line);
        }

        Ok(())
    }
}
