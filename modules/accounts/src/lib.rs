//! Accounts module: user registration, login, and the current-user lookup
//! behind the bearer tokens the rest of the API authenticates with.

pub mod api;
pub mod domain;
pub mod infra;

pub use domain::service::AccountService;
