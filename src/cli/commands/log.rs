use crate::cli::context::AppContext;
use crate::cli::parser::Commands;
use crate::db::log::load_log;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{CYAN, GREEN, MAGENTA, RED, RESET, YELLOW};
use crate::utils::table::Table;

fn color_for_operation(op: &str) -> &'static str {
    match op {
        "login" | "register" => GREEN,
        "logout" => YELLOW,
        "migration_applied" => MAGENTA,
        "seed" | "export" => CYAN,
        "init" => RED,
        _ => RESET,
    }
}

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Log { print: true, limit } = cmd {
        let entries = {
            let pool = ctx.pool.lock().await;
            load_log(&pool.conn, *limit)?
        };

        if entries.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        header("Internal log");
        let mut table = Table::with_headers(&["ID", "Date", "Operation", "Target", "Message"]);
        for e in entries.iter().rev() {
            table.add_row(vec![
                e.id.to_string(),
                e.date.clone(),
                format!("{}{}{RESET}", color_for_operation(&e.operation), e.operation),
                e.target.clone(),
                e.message.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
