//! Wallet Transaction Analyzer
//!
//! Monthly analytics over a transaction history. Rows with a non-positive
//! amount or an unknown type are dropped before anything is computed.

use serde::Serialize;
use serde_json::Value;

use crate::aggregate::{first_max_by, rounded_average, Tally};
use crate::error::{parse_document, Outcome, PipelineError};
use crate::schema::{self, filter_rows, Field, Filtered, Kind, Schema};

pub const TRANSACTION: Schema = Schema {
    name: "transaction",
    fields: &[
        Field::required("amount", Kind::PositiveNumber),
        Field::required("type", Kind::OneOf(&["credit", "debit"])),
    ],
};

/// `allAbove100` requires every amount strictly above this
const SMALL_AMOUNT_CEILING: f64 = 100.0;
/// `hasLargeTransaction` is set by any amount at or above this
const LARGE_AMOUNT_FLOOR: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
}

/// A transaction row that passed [`TRANSACTION`]
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction<'a> {
    pub direction: Direction,
    pub amount: f64,
    pub to: Option<&'a str>,
    pub category: Option<&'a str>,
    pub record: &'a Value,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletReport {
    pub total_credit: f64,
    pub total_debit: f64,
    pub net_balance: f64,
    pub transaction_count: usize,
    pub avg_transaction: i64,
    pub highest_transaction: Value,
    /// Number of transactions per category
    pub category_breakdown: Tally<u64>,
    /// Amount moved per category
    pub category_totals: Tally<f64>,
    pub frequent_contact: Option<String>,
    pub all_above100: bool,
    pub has_large_transaction: bool,
}

/// Keep the transactions that conform to [`TRANSACTION`]
pub fn filter_transactions(transactions: &[Value]) -> Filtered<Transaction<'_>> {
    filter_rows(transactions, |record| {
        let map = TRANSACTION.check(record)?;
        let direction = match schema::text(map, "type") {
            Some("credit") => Direction::Credit,
            _ => Direction::Debit,
        };

        Ok(Transaction {
            direction,
            amount: schema::number(map, "amount").unwrap_or_default(),
            to: schema::text(map, "to"),
            category: schema::text(map, "category"),
            record,
        })
    })
}

/// Analyze a transaction history
///
/// Fails when the input is not a non-empty sequence, or when no row survives
/// filtering. `frequentContact` is the most common `to`; ties go to the
/// contact seen first.
pub fn analyze_wallet_transactions(transactions: &Value) -> Outcome<WalletReport> {
    let rows = schema::rows(transactions, "transactions")
        .map_err(|v| PipelineError::malformed("transactions", v))?;

    let valid = filter_transactions(rows).kept;
    let Some(highest) = first_max_by(&valid, |t| t.amount) else {
        return Err(PipelineError::NoValidRows {
            container: "transactions",
        });
    };

    let mut total_credit = 0.0;
    let mut total_debit = 0.0;
    let mut category_breakdown = Tally::new();
    let mut category_totals = Tally::new();
    let mut contacts = Tally::new();

    for tx in &valid {
        match tx.direction {
            Direction::Credit => total_credit += tx.amount,
            Direction::Debit => total_debit += tx.amount,
        }
        if let Some(category) = tx.category {
            category_breakdown.count(category);
            category_totals.add(category, tx.amount);
        }
        if let Some(to) = tx.to {
            contacts.count(to);
        }
    }

    Ok(WalletReport {
        total_credit,
        total_debit,
        net_balance: total_credit - total_debit,
        transaction_count: valid.len(),
        avg_transaction: rounded_average(total_credit + total_debit, valid.len()),
        highest_transaction: highest.record.clone(),
        category_breakdown,
        category_totals,
        frequent_contact: contacts.mode().map(str::to_string),
        all_above100: valid.iter().all(|t| t.amount > SMALL_AMOUNT_CEILING),
        has_large_transaction: valid.iter().any(|t| t.amount >= LARGE_AMOUNT_FLOOR),
    })
}

/// Parse a transaction document and analyze it
pub fn analyze_wallet_transactions_json(input: &str) -> Outcome<WalletReport> {
    let transactions = parse_document(input)?;
    analyze_wallet_transactions(&transactions)
}
