//! Core library for tally
//!
//! This crate implements the **Functional Core** of the tally application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`tally_core`** (this crate): Pure validation and aggregation pipelines with zero I/O
//! - **`tally`**: Reading input documents and printing results (the Imperative Shell)
//!
//! Every pipeline runs the same four stages over an untyped JSON container:
//!
//! 1. **Shape validation**: the container must have the expected structure
//!    ([`schema::Schema::check`]). A violation aborts the call.
//! 2. **Row filtering**: rows failing their per-row schema are dropped
//!    ([`schema::filter_rows`]). If none survive, the call fails.
//! 3. **Aggregation**: sums, rounded averages, first-seen extrema and modes
//!    ([`aggregate`]), plus the pipeline's own business rules.
//! 4. **Formatting**: padded labels, grouped digits, receipt lines.
//!
//! A call returns either the full result or a [`error::PipelineError`];
//! there is no partial result.
//!
//! # Module Organization
//!
//! - [`team`]: Team Budget Manager
//! - [`delivery`]: Delivery Order Builder
//! - [`wallet`]: Wallet Transaction Analyzer
//! - [`booking`]: Train Booking Status Processor
//! - [`schema`]: Declarative shape checks shared by all pipelines
//! - [`aggregate`]: Order-preserving tallies, extrema and averages
//! - [`money`]: Cent-exact currency amounts
//! - [`error`]: The uniform failure type
//!
//! # Example Usage
//!
//! ```rust
//! use serde_json::json;
//! use tally_core::wallet::analyze_wallet_transactions;
//!
//! let transactions = json!([
//!     {"id": "t1", "type": "credit", "amount": 100, "to": "A"},
//!     {"id": "t2", "type": "debit", "amount": 150, "to": "B"},
//!     {"id": "t3", "type": "debit", "amount": 101, "to": "A"},
//!     {"id": "t4", "type": "refund", "amount": 999, "to": "B"}
//! ]);
//!
//! let report = analyze_wallet_transactions(&transactions).unwrap();
//! assert_eq!(report.transaction_count, 3);
//! assert_eq!(report.avg_transaction, 117);
//! assert_eq!(report.frequent_contact.as_deref(), Some("A"));
//! ```

pub mod aggregate;
pub mod booking;
pub mod delivery;
pub mod error;
pub mod money;
pub mod schema;
pub mod team;
pub mod wallet;

pub use error::{ErrorKind, Outcome, PipelineError};
