pub mod common;

mod config_validation;
mod fetch_and_retry;
