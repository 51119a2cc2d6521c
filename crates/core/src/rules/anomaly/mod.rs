//! Optional analytical rules B01 to B09.
//!
//! - `accounts` - materiality, abnormal, new and seldom used accounts
//! - `users` - unregistered users, unauthorized postings, self-approval
//! - `timing` - entries recorded after the cutoff or backdated
//! - `combination` - forbidden account combinations within a voucher

pub mod accounts;
pub mod combination;
pub mod timing;
pub mod users;

#[cfg(test)]
mod accounts_props;

pub use accounts::{abnormal_accounts, low_frequency_accounts, material_accounts, new_accounts};
pub use combination::combination_matches;
pub use timing::timing_anomalies;
pub use users::{self_approved_vouchers, unauthorized_postings, unregistered_users};
