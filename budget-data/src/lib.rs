//! Loaders that turn files supplied by the user into `budget-core` inputs.
//!
//! - [`TransactionLoader`]: transaction records from CSV.
//! - [`TaxBracketLoader`]: income-tax bracket tables from CSV.
//! - [`Settings`]: the user's salary settings from TOML.

pub mod bracket_loader;
pub mod settings;
pub mod transaction_loader;

pub use bracket_loader::{TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
pub use settings::{Settings, SettingsError};
pub use transaction_loader::{TransactionLoader, TransactionLoaderError, newest_first};
