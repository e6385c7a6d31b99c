pub mod check;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod exit;
pub mod targets;
