use crate::prelude::{println, *};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use tally_core::booking::{process_train_booking, BookingStatus, StatusLabel};

#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct App {
    /// JSON file with the booking object ("-" or absent for stdin)
    #[clap(env = "TALLY_INPUT")]
    input: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let booking = crate::input::load_document(app.input.as_deref(), global.verbose)?;
    let status = process_train_booking(&booking).map_err(Error::from)?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        output_formatted(&status);
    }

    Ok(())
}

fn label_text(label: StatusLabel) -> &'static str {
    match label {
        StatusLabel::Confirmed => "CONFIRMED",
        StatusLabel::Waitlisted => "WAITLISTED",
        StatusLabel::Cancelled => "CANCELLED",
        StatusLabel::Standby => "STANDBY",
        StatusLabel::Unknown => "UNKNOWN",
    }
}

fn colored_label(label: StatusLabel) -> ColoredString {
    let text = label_text(label);
    match label {
        StatusLabel::Confirmed => text.green(),
        StatusLabel::Waitlisted | StatusLabel::Standby => text.yellow(),
        StatusLabel::Cancelled => text.red(),
        StatusLabel::Unknown => text.dimmed(),
    }
}

fn output_formatted(status: &BookingStatus) {
    println!("\nBooking {}", status.booking_ref_formatted.bold());
    println!("{}\n", status.train_info);

    let mut table = new_table();
    table.add_row(prettytable::row!["Passenger", "Booked", "Current", "Status"]);
    for passenger in &status.passengers {
        table.add_row(prettytable::row![
            passenger.formatted_name,
            passenger.booking_status,
            passenger.current_status,
            colored_label(passenger.status_label)
        ]);
    }
    table.printstd();

    let summary = &status.summary;
    println!(
        "\n{} passengers: {} confirmed, {} waitlisted, {} cancelled, {} standby",
        summary.total_passengers,
        summary.confirmed,
        summary.waitlisted,
        summary.cancelled,
        summary.standby
    );

    let chart = if status.chart_prepared {
        "prepared".green()
    } else {
        "pending".yellow()
    };
    println!("Chart: {}\n", chart);
}
