//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`auth`] - Account management (register, login, logout, reset, whoami)
//! - [`build`] - One fetch cycle, printed as a text report
//! - [`catalog`] - Disease list and backend health
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`dashboard`] - Interactive terminal dashboard
//! - [`export`] - One fetch cycle, saved as a PNG or PDF box plot

pub mod auth;
pub mod build;
pub mod catalog;
pub mod common;
pub mod config;
pub mod dashboard;
pub mod export;
