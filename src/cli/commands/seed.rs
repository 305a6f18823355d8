use crate::cli::context::AppContext;
use crate::cli::parser::Commands;
use crate::db::seed::{SeedCollections, import_seed};
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Seed { file } = cmd {
        let path = expand_tilde(file);
        let content = tokio::fs::read_to_string(&path).await?;

        let collections = SeedCollections {
            bins: ctx.cfg.bins_collection.clone(),
            users: ctx.cfg.users_collection.clone(),
            roster: ctx.cfg.roster_collection.clone(),
        };

        let report = {
            let pool = ctx.pool.lock().await;
            import_seed(&pool.conn, &content, &collections)?
        };

        success(format!(
            "Seeded {} bin(s), {} user profile(s) ({} account(s)), {} roster entr(ies)",
            report.bins, report.users, report.accounts, report.roster
        ));

        ctx.audit(
            "seed",
            &path.display().to_string(),
            &format!("bins={} users={} roster={}", report.bins, report.users, report.roster),
        )
        .await;
    }
    Ok(())
}
