use crate::error::report_rejections;
use crate::prelude::{println, *};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use tally_core::delivery::{build_delivery_order, filter_cart, Coupon, DeliveryOrder};

#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct App {
    /// JSON file with the cart array ("-" or absent for stdin)
    #[clap(env = "TALLY_INPUT")]
    input: Option<PathBuf>,

    /// Coupon code (FIRST50, FLAT100, FREESHIP)
    #[arg(short, long, env = "TALLY_COUPON")]
    coupon: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let cart = crate::input::load_document(app.input.as_deref(), global.verbose)?;

    if let Some(rows) = cart.as_array() {
        report_rejections("cart item", &filter_cart(rows).rejected, global.verbose);
    }

    if let Some(code) = app.coupon.as_deref() {
        if Coupon::parse(code).is_none() {
            log::warn!("ignoring unknown coupon code {code:?}");
        }
    }

    let order = build_delivery_order(&cart, app.coupon.as_deref()).map_err(Error::from)?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&order)?);
    } else {
        output_formatted(&order);
    }

    Ok(())
}

fn output_formatted(order: &DeliveryOrder) {
    println!("\n{}\n", "Delivery Order".bold());

    let mut table = new_table();
    table.add_row(prettytable::row!["Item", "Qty", "Base", "Add-ons", "Total"]);
    for item in &order.items {
        table.add_row(prettytable::row![
            item.name,
            item.qty,
            item.base_price,
            item.addon_total,
            item.item_total
        ]);
    }
    table.printstd();

    println!();
    println!("{}", order.receipt);

    if let Some(coupon) = order.coupon {
        println!("\nCoupon applied: {}", coupon.code().green());
    }
    println!();
}
