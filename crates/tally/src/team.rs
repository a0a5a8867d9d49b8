use crate::error::report_rejections;
use crate::prelude::{println, *};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use tally_core::schema::scalar_text;
use tally_core::team::{filter_players, summarize_team_budget, TeamBudgetSummary};

#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct App {
    /// JSON file with `{ "team": {...}, "players": [...] }` ("-" or absent for stdin)
    #[clap(env = "TALLY_INPUT")]
    input: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let document = crate::input::load_document(app.input.as_deref(), global.verbose)?;

    if let Some(rows) = document["players"].as_array() {
        report_rejections("player", &filter_players(rows).rejected, global.verbose);
    }

    let summary =
        summarize_team_budget(&document["team"], &document["players"]).map_err(Error::from)?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output_formatted(&summary);
    }

    Ok(())
}

fn player_line(player: &serde_json::Value) -> String {
    format!(
        "{} ({})",
        scalar_text(player.get("name")),
        scalar_text(player.get("price"))
    )
}

fn output_formatted(summary: &TeamBudgetSummary) {
    let title = if summary.team_name.is_empty() {
        "Team".to_string()
    } else {
        summary.team_name.clone()
    };
    println!("\n{}\n", title.bold());

    let remaining = if summary.remaining < 0.0 {
        summary.remaining.to_string().red().to_string()
    } else {
        summary.remaining.to_string().green().to_string()
    };
    let over_budget = if summary.is_over_budget {
        "yes".red().bold().to_string()
    } else {
        "no".green().to_string()
    };

    let mut table = new_table();
    table.add_row(prettytable::row!["Total Spent", summary.total_spent]);
    table.add_row(prettytable::row!["Remaining", remaining]);
    table.add_row(prettytable::row!["Players", summary.player_count]);
    table.add_row(prettytable::row!["Average Price", summary.average_price]);
    table.add_row(prettytable::row![
        "Costliest",
        player_line(&summary.costliest_player)
    ]);
    table.add_row(prettytable::row![
        "Cheapest",
        player_line(&summary.cheapest_player)
    ]);
    table.add_row(prettytable::row!["Over Budget", over_budget]);
    table.printstd();

    println!("\nBy role:");
    let mut roles = new_table();
    for (role, count) in summary.by_role.iter() {
        roles.add_row(prettytable::row![role, count]);
    }
    roles.printstd();
    println!();
}
