//! Core types and pure logic for the Grocer purchase log.
//!
//! This crate is deliberately free of terminal and database dependencies.
//! Storage backends implement [`store::GroceryStore`]; the CLI drives an
//! [`store::ItemStore`] and renders a [`report::MonthlyReport`].

pub mod aggregate;
pub mod amount;
pub mod error;
pub mod memory;
pub mod month;
pub mod record;
pub mod report;
pub mod store;

pub use error::{Error, Result};
