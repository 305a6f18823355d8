use crate::cli::context::AppContext;
use crate::errors::AppResult;
use crate::ports::{SessionStorage, USER_SESSION_KEY};
use crate::models::session::Session;
use crate::ui::messages::{info, success};

pub async fn handle(ctx: &AppContext) -> AppResult<()> {
    let previous = ctx
        .storage
        .get(USER_SESSION_KEY)
        .await?
        .as_deref()
        .and_then(Session::from_blob);

    let mut gate = ctx.gate();
    gate.logout().await?;

    match previous {
        Some(session) => {
            ctx.audit("logout", &session.uid, session.role.as_str()).await;
            success("Logged out.");
        }
        None => info("No active session; local session data cleared."),
    }
    Ok(())
}
