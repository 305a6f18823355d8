use crate::cli::context::AppContext;
use crate::cli::parser::Commands;
use crate::core::session_gate::Landing;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Login {
        identifier,
        password,
    } = cmd
    {
        let mut gate = ctx.gate();
        let landing = gate.login(identifier, password).await?;

        let (uid, role) = gate
            .session()
            .map(|s| (s.uid.clone(), s.role.as_str()))
            .unwrap_or_default();
        ctx.audit("login", &uid, role).await;

        match landing {
            Landing::Screen(screen) => {
                success(format!("Logged in as {uid} ({role}) → {}", screen.label()));
            }
            Landing::Unauthorized(msg) => return Err(AppError::Unauthorized(msg.to_string())),
        }
    }
    Ok(())
}
