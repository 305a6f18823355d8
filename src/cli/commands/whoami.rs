use crate::cli::context::AppContext;
use crate::core::session_gate::{Landing, landing_for};
use crate::errors::AppResult;
use crate::models::session::Session;
use crate::ports::{SessionStorage, USER_SESSION_KEY};
use crate::ui::messages::{info, warning};

pub async fn handle(ctx: &AppContext) -> AppResult<()> {
    let blob = ctx.storage.get(USER_SESSION_KEY).await?;

    let Some(blob) = blob else {
        info("Not logged in.");
        return Ok(());
    };

    match Session::from_blob(&blob) {
        Some(session) => {
            println!("uid  : {}", session.uid);
            println!("role : {}", session.role.as_str());
            match landing_for(session.role) {
                Landing::Screen(screen) => println!("home : {}", screen.label()),
                Landing::Unauthorized(msg) => warning(msg),
            }
        }
        None => warning("Stored session is unreadable; run `envirosage logout` to reset it."),
    }
    Ok(())
}
