use crate::cli::context::AppContext;
use crate::cli::parser::{BinsCommand, Commands};
use crate::core::fleet_store::FleetStore;
use crate::core::forecast::{collection_priorities, samples_until_full};
use crate::core::refresh::{RandomWalkSource, spawn_refresh};
use crate::core::search::SearchIndex;
use crate::core::selection::{DetailSelection, DetailView};
use crate::errors::{AppError, AppResult};
use crate::models::screen::Screen;
use crate::models::status::BinStatus;
use crate::models::telemetry::TelemetryRecord;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{RESET, color_for_priority, colorize_optional, colorize_status};
use crate::utils::formatting::{bold, fill_bar, format_percent, format_weight};
use crate::utils::table::Table;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    let Commands::Bins { action } = cmd else {
        return Ok(());
    };

    match action {
        BinsCommand::List { search, status } => list(ctx, search.as_deref(), status.as_deref()).await,
        BinsCommand::Show { id } => show(ctx, *id).await,
        BinsCommand::Map => map(ctx).await,
        BinsCommand::Priority => priority(ctx).await,
        BinsCommand::Watch {
            ticks,
            interval_ms,
            seed,
        } => {
            let every = Duration::from_millis(interval_ms.unwrap_or(ctx.cfg.refresh_interval_ms));
            watch(ctx, *ticks, every, *seed).await
        }
    }
}

fn location_label(r: &TelemetryRecord) -> String {
    match (&r.address, r.location) {
        (Some(addr), _) => addr.clone(),
        (None, Some(p)) => format!("{:.4}, {:.4}", p.latitude, p.longitude),
        (None, None) => "--".to_string(),
    }
}

fn fleet_table(records: &[&TelemetryRecord]) -> Table {
    let mut table =
        Table::with_headers(&["ID", "Name", "Fill", "Gauge", "Status", "Weight", "Location"]);
    for r in records {
        table.add_row(vec![
            r.id.to_string(),
            r.name.clone(),
            format_percent(r.fill_percent()),
            fill_bar(r.fill_percent()),
            colorize_status(r.status()),
            format_weight(r.weight),
            colorize_optional(&location_label(r)),
        ]);
    }
    table
}

fn print_summary(store: &FleetStore) {
    let s = store.status_summary();
    println!(
        "{} bins: {} low, {} medium, {} high\n",
        s.total(),
        s.low,
        s.medium,
        s.high
    );
}

async fn list(ctx: &AppContext, search: Option<&str>, status: Option<&str>) -> AppResult<()> {
    ctx.require(Screen::FleetDashboard).await?;

    let status = status
        .map(|code| BinStatus::from_code(code).ok_or_else(|| AppError::InvalidStatus(code.to_string())))
        .transpose()?;

    let (store, _) = ctx.load_fleet().await?;
    header(Screen::FleetDashboard.label());
    print_summary(&store);

    let index = SearchIndex::new(search.unwrap_or_default());
    let rows: Vec<&TelemetryRecord> = index
        .apply(store.list())
        .into_iter()
        .filter(|r| status.is_none_or(|s| r.status() == s))
        .collect();

    if rows.is_empty() {
        info("No bins match the current filters.");
        return Ok(());
    }

    print!("{}", fleet_table(&rows).render());
    Ok(())
}

async fn show(ctx: &AppContext, id: u64) -> AppResult<()> {
    ctx.require(Screen::BinDetail).await?;
    let (store, _) = ctx.load_fleet().await?;

    let mut selection = DetailSelection::new();
    if !selection.select(id, &store) {
        return Err(AppError::BinNotFound(id));
    }
    let record = selection.current(&store).ok_or(AppError::BinNotFound(id))?;
    let view = DetailView::from_record(record);

    header(format!("{} #{}", bold(&view.name), view.id));
    println!(
        "Fill level      : {} {}",
        format_percent(view.fill_percent),
        fill_bar(view.fill_percent)
    );
    println!("Status          : {} ({})", colorize_status(view.status), view.color);
    println!("Weight          : {}", format_weight(view.weight_kg));
    println!("Last emptied    : {}", colorize_optional(&view.last_emptied));
    println!("Time left       : {}", colorize_optional(&view.time_left));
    println!("Predicted full  : {}", colorize_optional(&view.predicted_fill_time));
    println!("Location        : {}", colorize_optional(&view.location));

    if let Some(steps) = samples_until_full(record) {
        println!("Trend           : full in ~{steps:.1} sample(s)");
    }

    if !view.history.is_empty() {
        println!();
        let mut table = Table::with_headers(&["Day", "Fill", "Gauge"]);
        for point in &view.history {
            table.add_row(vec![
                point.label.clone(),
                format_percent(point.percent),
                fill_bar(point.percent),
            ]);
        }
        print!("{}", table.render());
    }
    Ok(())
}

async fn map(ctx: &AppContext) -> AppResult<()> {
    ctx.require(Screen::FleetDashboard).await?;
    let (store, _) = ctx.load_fleet().await?;

    let mut table = Table::with_headers(&["ID", "Name", "Latitude", "Longitude", "Marker"]);
    for r in store.mappable() {
        if let Some(p) = r.location {
            table.add_row(vec![
                r.id.to_string(),
                r.name.clone(),
                format!("{:.6}", p.latitude),
                format!("{:.6}", p.longitude),
                format!("{} {}", r.status().color_name(), r.status().hex()),
            ]);
        }
    }

    header("Map markers");
    let plotted = table.rows.len();
    if plotted > 0 {
        print!("{}", table.render());
    }
    info(format!(
        "{plotted} bin(s) plotted, {} without coordinates",
        store.len() - plotted
    ));
    Ok(())
}

async fn priority(ctx: &AppContext) -> AppResult<()> {
    ctx.require(Screen::FleetDashboard).await?;
    let (store, _) = ctx.load_fleet().await?;

    let ranked = collection_priorities(store.list());
    if ranked.is_empty() {
        info("No bin has enough history to estimate a fill trend.");
        return Ok(());
    }

    header("Collection priority");
    let mut table = Table::with_headers(&["Priority", "ID", "Name", "Slope", "Full in"]);
    for p in &ranked {
        let eta = store
            .by_id(p.id)
            .and_then(samples_until_full)
            .map(|s| format!("{s:.1}"))
            .unwrap_or_else(|| "--".to_string());
        table.add_row(vec![
            format!("{}{}{RESET}", color_for_priority(p.priority), p.priority),
            p.id.to_string(),
            p.name.clone(),
            format!("{:+.3}", p.slope),
            colorize_optional(&eta),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}

async fn watch(ctx: &AppContext, ticks: u64, every: Duration, seed: u64) -> AppResult<()> {
    ctx.require(Screen::FleetDashboard).await?;
    let (store, _) = ctx.load_fleet().await?;
    let store = Arc::new(RwLock::new(store));

    info(format!(
        "Watching {} bin(s), one reading every {} ms",
        store.read().await.len(),
        every.as_millis()
    ));

    let mut handle = spawn_refresh(store.clone(), RandomWalkSource::new(seed), every);
    let completed = handle
        .follow(ticks, |tick| {
            let store = store.clone();
            async move {
                let summary = store.read().await.status_summary();
                println!(
                    "tick {tick}: {} low, {} medium, {} high",
                    summary.low, summary.medium, summary.high
                );
            }
        })
        .await;
    handle.shutdown().await;

    let guard = store.read().await;
    let rows: Vec<&TelemetryRecord> = guard.list().iter().collect();
    if !rows.is_empty() {
        println!();
        print!("{}", fleet_table(&rows).render());
    }
    if completed < ticks {
        warning(format!("Refresh stopped early after {completed} of {ticks} tick(s)"));
    }
    success(format!("Watch finished after {completed} tick(s)"));
    Ok(())
}
