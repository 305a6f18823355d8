use crate::cli::context::AppContext;
use crate::cli::parser::Commands;
use crate::core::search::SearchIndex;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::screen::Screen;
use crate::utils::path::absolutize;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        search,
        force,
    } = cmd
    {
        ctx.require(Screen::FleetDashboard).await?;
        let (store, _) = ctx.load_fleet().await?;

        let index = SearchIndex::new(search.clone().unwrap_or_default());
        let selected = index.apply(store.list());

        let target = absolutize(file).to_string_lossy().to_string();
        let written = ExportLogic::export(&selected, *format, &target, *force)?;

        if written > 0 {
            ctx.audit(
                "export",
                &target,
                &format!("{} bin(s) as {}", written, format.as_str()),
            )
            .await;
        }
    }
    Ok(())
}
