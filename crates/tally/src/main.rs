use crate::prelude::*;
use clap::Parser;

mod booking;
mod delivery;
mod error;
mod input;
mod prelude;
mod team;
mod wallet;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Validate and summarize team rosters, delivery carts, wallet histories and train bookings"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "TALLY_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommands {
    /// Summarize a team roster against its budget
    Team(crate::team::App),

    /// Price a delivery cart with fees, tax and coupons
    Delivery(crate::delivery::App),

    /// Analyze a wallet transaction history
    Wallet(crate::wallet::App),

    /// Show the status of a train booking
    Booking(crate::booking::App),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Team(sub_app) => crate::team::run(sub_app, app.global),
        SubCommands::Delivery(sub_app) => crate::delivery::run(sub_app, app.global),
        SubCommands::Wallet(sub_app) => crate::wallet::run(sub_app, app.global),
        SubCommands::Booking(sub_app) => crate::booking::run(sub_app, app.global),
    }
}
