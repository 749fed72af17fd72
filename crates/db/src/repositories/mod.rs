//! Repository abstractions for data access.
//!
//! One repository per aggregate: periods (registry), ledger (valuation,
//! balances, carry-forward), products (catalog), sales (checkout commit).

pub mod ledger;
pub mod period;
pub mod product;
pub mod sale;

pub use ledger::LedgerRepository;
pub use period::PeriodRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;
