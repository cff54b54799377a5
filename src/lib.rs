pub mod api;
pub mod config;
pub mod db;
pub mod generator;
pub mod ledger;
pub mod models;
pub mod store;
