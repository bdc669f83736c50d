mod cli;

use async_trait::async_trait;
use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

use pilego_recycling::{
    directory::{CollectionPointDirectory, SearchQuery},
    geo::{Coordinates, Geolocator},
    inventory::{Battery, BatteryFilter, BatteryKind},
    rewards::level_title,
    scan::{PayloadScanner, ScanOutcome, ScanSession},
    seed, utils, Config, PileError, RecyclingEngine, Result,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pilego_recycling=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match seed::engine(&config) {
        Ok(engine) => run(cli.command, &config, engine).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &Config, mut engine: RecyclingEngine) -> Result<()> {
    match command {
        Commands::Inventory { status, format } => show_inventory(&engine, &status, &format),

        Commands::Add {
            kind,
            brand,
            location,
            expires,
        } => {
            let kind: BatteryKind = kind.parse()?;
            let expiry = expires.as_deref().map(utils::parse_date).transpose()?;
            let battery = engine.register_battery(kind, &brand, &location, expiry)?;
            println!("{}", format!("✓ Battery #{} added to your inventory", battery.id).green());
            show_inventory(&engine, "all", "table")
        }

        Commands::Recycle { id } => {
            let battery = engine.mark_recycled(id)?;
            println!(
                "{}",
                format!("✓ {} {} marked as recycled", battery.brand, battery.kind).green()
            );
            if let Some(at) = &battery.recycled_at {
                println!("Recycled at: {}", utils::format_timestamp(at));
            }
            println!(
                "Batteries recycled: {}",
                engine.ledger().profile().total_batteries_recycled
            );
            show_inventory(&engine, "recycled", "table")
        }

        Commands::Remove { id } => {
            engine.remove_battery(id)?;
            println!("{}", format!("✓ Battery #{} removed", id).green());
            show_inventory(&engine, "all", "table")
        }

        Commands::Points {
            text,
            category,
            lat,
            lng,
            format,
        } => {
            info!("Searching collection points...");
            let position = lat.zip(lng).map(|(lat, lng)| Coordinates::new(lat, lng));
            search_points(config, &text, &category, position, &format).await
        }

        Commands::Scan { payload } => scan_payload(&mut engine, payload).await,

        Commands::Profile => {
            show_profile(&engine);
            Ok(())
        }

        Commands::Rewards => {
            show_rewards(&engine);
            Ok(())
        }

        Commands::Redeem { id } => {
            let catalog = seed::reward_catalog();
            let reward = engine.redeem(&catalog, &id)?;
            println!("{}", format!("✓ {} redeemed", reward.title).green());
            println!(
                "Balance: {} (redemption does not deduct points)",
                utils::format_points(engine.ledger().total_points())
            );
            Ok(())
        }
    }
}

/// Geolocation stand-in for the terminal: a position given on the command
/// line, or none at all.
struct FixedGeolocator {
    position: Option<Coordinates>,
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self, _timeout: Duration) -> Result<Coordinates> {
        self.position
            .ok_or_else(|| PileError::LocationUnavailable("no position given".to_string()))
    }
}

#[derive(Serialize)]
struct BatteryRow<'a> {
    #[serde(flatten)]
    battery: &'a Battery,
    expired: bool,
}

fn inventory_json(list: &[&Battery]) -> Result<String> {
    let rows: Vec<BatteryRow> = list
        .iter()
        .map(|&battery| BatteryRow {
            battery,
            expired: battery.is_expired(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

fn show_inventory(engine: &RecyclingEngine, status: &str, format: &str) -> Result<()> {
    let batteries = engine.batteries();
    let list = match status {
        "active" => batteries.list(BatteryFilter::ActiveOnly),
        "recycled" => batteries.list(BatteryFilter::RecycledOnly),
        "expired" => batteries.expired(),
        "all" => batteries.list(BatteryFilter::All),
        other => {
            return Err(PileError::Validation(format!("unknown status filter: {}", other)));
        }
    };

    if format == "json" {
        println!("{}", inventory_json(&list)?);
        return Ok(());
    }

    let summary = batteries.summary_at(chrono::Utc::now());
    println!("\n{}", "=== My Batteries ===".cyan().bold());
    println!(
        "Active: {}  Expired: {}  Recycled: {}",
        summary.active.to_string().green(),
        summary.expired.to_string().red(),
        summary.recycled.to_string().cyan()
    );
    if summary.expired > 0 {
        println!("{}", "Remember to drop expired batteries at a collection point".yellow());
    }

    if list.is_empty() {
        println!("\nNo batteries to show");
        return Ok(());
    }

    let widths = [4, 8, 12, 22, 12, 10];
    utils::print_table_border(78);
    utils::print_table_row(&["Id", "Type", "Brand", "Location", "Expires", "Status"], &widths);
    utils::print_table_border(78);
    for battery in list {
        let status = if battery.recycled {
            "Recycled".green().to_string()
        } else if battery.is_expired() {
            "Expired".red().to_string()
        } else {
            "Active".to_string()
        };
        let expires = battery
            .expiry_date
            .as_ref()
            .map(utils::format_date)
            .unwrap_or_else(|| "-".to_string());

        utils::print_table_row(
            &[
                &battery.id.to_string(),
                &battery.kind.to_string(),
                &utils::truncate(&battery.brand, 12),
                &utils::truncate(&battery.location, 22),
                &expires,
                &status,
            ],
            &widths,
        );
    }
    utils::print_table_border(78);
    Ok(())
}

async fn search_points(
    config: &Config,
    text: &str,
    category: &str,
    position: Option<Coordinates>,
    format: &str,
) -> Result<()> {
    let directory = CollectionPointDirectory::from_config(seed::collection_points(), config);
    let query = SearchQuery::new(text).with_category(SearchQuery::parse_category(category)?);
    let results = directory
        .search_near(&FixedGeolocator { position }, &query)
        .await;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let counts = directory.category_counts();
    println!("\n{}", "=== Collection Points ===".cyan().bold());
    println!(
        "Available: {}  (stores {}, schools {}, public {}, events {})",
        results.len().to_string().green(),
        counts.store,
        counts.school,
        counts.public,
        counts.event
    );

    if results.is_empty() {
        println!("\nNo collection point found. Try another search or filter.");
        return Ok(());
    }

    let widths = [30, 14, 9, 20];
    utils::print_table_border(80);
    utils::print_table_row(&["Name", "Type", "Distance", "Hours"], &widths);
    utils::print_table_border(80);
    for hit in &results {
        utils::print_table_row(
            &[
                &utils::truncate(&hit.point.name, 30),
                hit.point.category.label(),
                &hit.distance_label().unwrap_or_default(),
                hit.point.hours.as_deref().unwrap_or("-"),
            ],
            &widths,
        );
        println!("  {} {}", hit.point.address, hit.point.directions_url().dimmed());
    }
    utils::print_table_border(80);
    Ok(())
}

async fn scan_payload(engine: &mut RecyclingEngine, payload: String) -> Result<()> {
    let mut session = ScanSession::new(PayloadScanner::new(Some(payload)));

    match session.scan(engine).await? {
        Some(ScanOutcome::BatteryRegistered { battery_id }) => {
            println!("{}", format!("✓ Battery #{} added to your inventory!", battery_id).green());
        }
        Some(ScanOutcome::PointValidated {
            points_awarded,
            leveled_up,
        }) => {
            println!(
                "{}",
                format!("✓ Collection point validated! +{} points", points_awarded).green()
            );
            announce_level(engine, leveled_up);
        }
        Some(ScanOutcome::EventRegistered {
            points_awarded,
            leveled_up,
        }) => {
            println!(
                "{}",
                format!("✓ Event registered! +{} points, reward unlocked", points_awarded).green()
            );
            announce_level(engine, leveled_up);
        }
        Some(ScanOutcome::Unrecognized) => {
            println!("{}", "Unrecognized code: this QR code is not a Pile&Go code".yellow());
        }
        None => println!("Scan cancelled"),
    }

    println!("Balance: {}", utils::format_points(engine.ledger().total_points()));
    Ok(())
}

fn announce_level(engine: &RecyclingEngine, leveled_up: bool) {
    if leveled_up {
        let level = engine.ledger().level();
        println!(
            "{}",
            format!("★ Level {} reached: {}", level, level_title(level)).cyan().bold()
        );
    }
}

fn show_profile(engine: &RecyclingEngine) {
    let ledger = engine.ledger();
    let profile = ledger.profile();
    let progress = ledger.progress();

    println!("\n{}", format!("=== {} ===", profile.name).cyan().bold());
    println!("{} - Level {}", progress.title, progress.level);
    println!("Points:              {}", utils::format_points(profile.total_points));
    println!("Batteries recycled:  {}", profile.total_batteries_recycled);
    println!("Events attended:     {}", profile.events_attended);

    match (progress.next_level_points, progress.points_to_next_level) {
        (Some(next), Some(missing)) => println!(
            "Progress:            {}/{} ({:.0}%), {} points to level {}",
            progress.total_points,
            next,
            progress.fraction * 100.0,
            missing,
            progress.level + 1
        ),
        _ => println!("Progress:            {}", "maximum level reached".green()),
    }

    if !profile.achievements.is_empty() {
        println!("\n{}", "Achievements:".yellow());
        for achievement in &profile.achievements {
            println!(
                "  ✓ {} - {} ({})",
                achievement.title,
                achievement.description,
                utils::format_date(&achievement.unlocked_at)
            );
        }
    }
}

fn show_rewards(engine: &RecyclingEngine) {
    let catalog = seed::reward_catalog();
    let total_points = engine.ledger().total_points();

    println!("\n{}", "=== Rewards ===".cyan().bold());
    println!("Your points: {}", utils::format_points(total_points));
    println!(
        "Eligible now: {}",
        engine.eligible_rewards(&catalog).len().to_string().green()
    );

    let widths = [4, 36, 10, 10];
    utils::print_table_border(66);
    utils::print_table_row(&["Id", "Reward", "Cost", "Status"], &widths);
    utils::print_table_border(66);
    for reward in &catalog {
        let status = if reward.is_eligible(total_points) {
            "Available".green().to_string()
        } else {
            "Locked".dimmed().to_string()
        };
        utils::print_table_row(
            &[
                &reward.id,
                &utils::truncate(&reward.title, 36),
                &reward.points_required.to_string(),
                &status,
            ],
            &widths,
        );
    }
    utils::print_table_border(66);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_json_is_a_standalone_document() {
        let engine = seed::engine(&Config::default()).unwrap();
        let list = engine.batteries().list(BatteryFilter::All);

        let rendered = inventory_json(&list).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[0]["brand"], "Duracell");
        assert!(rows[0]["expired"].is_boolean());
        assert_eq!(rows[3]["recycled"], true);
    }

    #[test]
    fn test_points_json_is_a_standalone_document() {
        let config = Config::default();
        let directory = CollectionPointDirectory::from_config(seed::collection_points(), &config);
        let results = directory.search(&SearchQuery::new(""), Some(directory.default_origin()));

        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string_pretty(&results).unwrap()).unwrap();
        let hits = parsed.as_array().unwrap();
        assert_eq!(hits.len(), results.len());
        assert!(hits.iter().all(|hit| hit["distance_km"].is_number()));
    }
}
