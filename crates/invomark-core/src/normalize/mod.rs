//! Cleanup of raw values read from invoices.
//!
//! Normalizers never fail: values that cannot be interpreted come back as
//! sentinel variants that still render into the export.

pub mod currency;
pub mod date;

pub use currency::{normalize_currency, Currency, NormalizedAmount};
pub use date::{normalize_date, NormalizedDate};
