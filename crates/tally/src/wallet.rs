use crate::error::report_rejections;
use crate::prelude::{println, *};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use tally_core::schema::scalar_text;
use tally_core::wallet::{analyze_wallet_transactions, filter_transactions, WalletReport};

#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct App {
    /// JSON file with the transaction array ("-" or absent for stdin)
    #[clap(env = "TALLY_INPUT")]
    input: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let transactions = crate::input::load_document(app.input.as_deref(), global.verbose)?;

    if let Some(rows) = transactions.as_array() {
        report_rejections(
            "transaction",
            &filter_transactions(rows).rejected,
            global.verbose,
        );
    }

    let report = analyze_wallet_transactions(&transactions).map_err(Error::from)?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output_formatted(&report);
    }

    Ok(())
}

fn flag(value: bool) -> String {
    if value {
        "yes".green().to_string()
    } else {
        "no".dimmed().to_string()
    }
}

fn output_formatted(report: &WalletReport) {
    println!("\n{}\n", "Wallet Summary".bold());

    let net = if report.net_balance < 0.0 {
        report.net_balance.to_string().red().to_string()
    } else {
        report.net_balance.to_string().green().to_string()
    };
    let highest = &report.highest_transaction;

    let mut table = new_table();
    table.add_row(prettytable::row!["Total Credit", report.total_credit]);
    table.add_row(prettytable::row!["Total Debit", report.total_debit]);
    table.add_row(prettytable::row!["Net Balance", net]);
    table.add_row(prettytable::row!["Transactions", report.transaction_count]);
    table.add_row(prettytable::row!["Average", report.avg_transaction]);
    table.add_row(prettytable::row![
        "Highest",
        format!(
            "{} {} ({})",
            scalar_text(highest.get("id")),
            scalar_text(highest.get("amount")),
            scalar_text(highest.get("type"))
        )
    ]);
    table.add_row(prettytable::row![
        "Frequent Contact",
        report.frequent_contact.as_deref().unwrap_or("-")
    ]);
    table.add_row(prettytable::row!["All Above 100", flag(report.all_above100)]);
    table.add_row(prettytable::row![
        "Large Transaction",
        flag(report.has_large_transaction)
    ]);
    table.printstd();

    if !report.category_breakdown.is_empty() {
        println!("\nBy category:");
        let mut categories = new_table();
        categories.add_row(prettytable::row!["Category", "Count", "Amount"]);
        for (category, count) in report.category_breakdown.iter() {
            let amount = report.category_totals.get(category).unwrap_or_default();
            categories.add_row(prettytable::row![category, count, amount]);
        }
        categories.printstd();
    }
    println!();
}
