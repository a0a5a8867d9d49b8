//! Delivery Order Builder
//!
//! Turns a cart into a priced order: per-item totals with add-ons, a tiered
//! delivery fee, sales tax, an optional coupon and a printable receipt.
//! All amounts are [`Money`], so they serialize as two-decimal text.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::{parse_document, Outcome, PipelineError};
use crate::money::Money;
use crate::schema::{self, filter_rows, Field, Filtered, Kind, Schema, Violation};

pub const CART_ITEM: Schema = Schema {
    name: "cart item",
    fields: &[
        Field::required("name", Kind::Text),
        Field::required("price", Kind::NonNegativeNumber),
        Field::required("qty", Kind::Integer),
        Field::optional("addons", Kind::TextList),
    ],
};

/// Below this subtotal the full delivery fee applies
pub const REDUCED_FEE_FROM: Money = Money::units(500);
/// From this subtotal on, delivery is free
pub const FREE_DELIVERY_FROM: Money = Money::units(1000);

const FULL_FEE: Money = Money::units(30);
const REDUCED_FEE: Money = Money::units(15);
const SALES_TAX_PERCENT: i64 = 5;
const FIRST50_CAP: Money = Money::units(150);
const FLAT100_AMOUNT: Money = Money::units(100);

/// Largest line total (price plus add-ons, times quantity) an item may carry
pub const MAX_LINE_TOTAL: f64 = 1e12;

const RECEIPT_LABEL_WIDTH: usize = 24;
const RECEIPT_AMOUNT_WIDTH: usize = 10;

/// `"Name:Price"`; the price is everything after the last colon
static ADDON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>.*):\s*(?P<price>\d+(?:\.\d+)?)\s*$").unwrap());

/// Recognized coupon codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Coupon {
    /// 50% off the subtotal, capped at 150
    #[serde(rename = "FIRST50")]
    First50,
    /// Flat 100 off
    #[serde(rename = "FLAT100")]
    Flat100,
    /// Cancels the delivery fee
    #[serde(rename = "FREESHIP")]
    FreeShip,
}

impl Coupon {
    /// Match a code, ignoring surrounding whitespace and case
    pub fn parse(code: &str) -> Option<Coupon> {
        match code.trim().to_ascii_uppercase().as_str() {
            "FIRST50" => Some(Coupon::First50),
            "FLAT100" => Some(Coupon::Flat100),
            "FREESHIP" => Some(Coupon::FreeShip),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Coupon::First50 => "FIRST50",
            Coupon::Flat100 => "FLAT100",
            Coupon::FreeShip => "FREESHIP",
        }
    }

    /// Discount granted on an order with the given subtotal and delivery fee
    pub fn discount(&self, subtotal: Money, delivery_fee: Money) -> Money {
        match self {
            Coupon::First50 => subtotal.percent(50).min(FIRST50_CAP),
            Coupon::Flat100 => FLAT100_AMOUNT,
            Coupon::FreeShip => delivery_fee,
        }
    }
}

/// One priced line of the order
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub qty: i64,
    pub base_price: Money,
    /// Add-on price per unit
    pub addon_total: Money,
    pub item_total: Money,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrder {
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub sales_tax: Money,
    pub coupon: Option<Coupon>,
    pub discount: Money,
    pub grand_total: Money,
    pub receipt: String,
}

fn addon_amount(addons: &[Value]) -> f64 {
    addons
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|addon| ADDON_RE.captures(addon))
        .filter_map(|caps| caps["price"].parse::<f64>().ok())
        .sum()
}

/// Per-unit price of an add-on list; malformed entries contribute nothing
pub fn addon_price(addons: &[Value]) -> Money {
    Money::from_f64(addon_amount(addons))
}

/// Fee tier for a subtotal: `[0, 500)` full, `[500, 1000)` reduced, `[1000, ..)` free
pub fn delivery_fee(subtotal: Money) -> Money {
    if subtotal < REDUCED_FEE_FROM {
        FULL_FEE
    } else if subtotal < FREE_DELIVERY_FROM {
        REDUCED_FEE
    } else {
        Money::ZERO
    }
}

/// Price the cart items that conform to [`CART_ITEM`] and have a positive quantity
pub fn filter_cart(cart: &[Value]) -> Filtered<OrderItem> {
    filter_rows(cart, |record| {
        let map = CART_ITEM.check(record)?;

        let qty = schema::number(map, "qty").unwrap_or_default();
        if qty <= 0.0 {
            return Err(Violation::WrongKind {
                field: "qty",
                expected: "a positive quantity".to_string(),
            });
        }

        let price = schema::number(map, "price").unwrap_or_default();
        let addons = map
            .get("addons")
            .and_then(Value::as_array)
            .map(|addons| addon_amount(addons))
            .unwrap_or_default();

        // Rounded to cents only once the whole line is known
        let line_total = (price + addons) * qty;
        if !line_total.is_finite() || line_total > MAX_LINE_TOTAL {
            return Err(Violation::WrongKind {
                field: "price",
                expected: format!("an amount with a line total of at most {MAX_LINE_TOTAL}"),
            });
        }

        Ok(OrderItem {
            name: schema::text(map, "name").unwrap_or_default().to_string(),
            qty: qty as i64,
            base_price: Money::from_f64(price),
            addon_total: Money::from_f64(addons),
            item_total: Money::from_f64(line_total),
        })
    })
}

/// Build a priced delivery order from a cart and an optional coupon code
///
/// Unknown coupon codes are ignored. The grand total never goes below zero.
pub fn build_delivery_order(cart: &Value, coupon: Option<&str>) -> Outcome<DeliveryOrder> {
    let rows = schema::rows(cart, "cart").map_err(|v| PipelineError::malformed("cart", v))?;

    let items = filter_cart(rows).kept;
    if items.is_empty() {
        return Err(PipelineError::NoValidRows { container: "cart" });
    }

    let subtotal: Money = items.iter().map(|item| item.item_total).sum();
    let delivery_fee = delivery_fee(subtotal);
    let sales_tax = subtotal.percent(SALES_TAX_PERCENT);

    let coupon = coupon.and_then(Coupon::parse);
    let discount = coupon
        .map(|c| c.discount(subtotal, delivery_fee))
        .unwrap_or(Money::ZERO);

    let grand_total = (subtotal + delivery_fee + sales_tax - discount).clamp_non_negative();

    let mut order = DeliveryOrder {
        items,
        subtotal,
        delivery_fee,
        sales_tax,
        coupon,
        discount,
        grand_total,
        receipt: String::new(),
    };
    order.receipt = format_receipt(&order);

    Ok(order)
}

/// Parse a cart document and build the order
pub fn build_delivery_order_json(input: &str, coupon: Option<&str>) -> Outcome<DeliveryOrder> {
    let cart = parse_document(input)?;
    build_delivery_order(&cart, coupon)
}

fn receipt_line(label: &str, amount: &str) -> String {
    format!(
        "{:<label_width$}{:>amount_width$}",
        label,
        amount,
        label_width = RECEIPT_LABEL_WIDTH,
        amount_width = RECEIPT_AMOUNT_WIDTH
    )
}

/// Render the order as fixed-width receipt lines joined by `\n`
pub fn format_receipt(order: &DeliveryOrder) -> String {
    let mut lines: Vec<String> = order
        .items
        .iter()
        .map(|item| {
            receipt_line(
                &format!("{} x{}", item.name, item.qty),
                &item.item_total.to_string(),
            )
        })
        .collect();

    lines.push("-".repeat(RECEIPT_LABEL_WIDTH + RECEIPT_AMOUNT_WIDTH));
    lines.push(receipt_line("Subtotal", &order.subtotal.to_string()));
    lines.push(receipt_line("Delivery Fee", &order.delivery_fee.to_string()));
    lines.push(receipt_line("Sales Tax", &order.sales_tax.to_string()));

    if order.discount > Money::ZERO {
        let label = match order.coupon {
            Some(coupon) => format!("Discount ({})", coupon.code()),
            None => "Discount".to_string(),
        };
        lines.push(receipt_line(&label, &format!("-{}", order.discount)));
    }

    lines.push(receipt_line("Grand Total", &order.grand_total.to_string()));
    lines.join("\n")
}
