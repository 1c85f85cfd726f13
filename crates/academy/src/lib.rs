//! Class schedule conflict checking for a tutoring academy console.
//!
//! The [`schedule`] module holds the conflict checker, [`db`] the class
//! store it reads from, and [`server`] the HTTP endpoints that gate class
//! creation and schedule edits on the checker's result.

pub mod config;
pub mod db;
pub mod schedule;
pub mod server;
pub mod types;
