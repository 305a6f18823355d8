use crate::cli::context::AppContext;
use crate::errors::AppResult;
use crate::models::screen::Screen;
use crate::ui::messages::header;

pub async fn handle(ctx: &AppContext) -> AppResult<()> {
    let session = ctx.require(Screen::DriverConsole).await?;

    header(Screen::DriverConsole.label());
    println!("Driver User Logged In ({})", session.uid);
    Ok(())
}
