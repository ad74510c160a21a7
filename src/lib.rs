//! Users dashboard backend.
//!
//! Pulls the user list from a REST API into a SQLite snapshot, derives
//! display fields on load and serves statistics, CSV and chart exports.

pub mod cache;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod source;
