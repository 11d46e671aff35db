//! Haulbook library
//!
//! Trip ledger for container haulage: route fares, trip recording and
//! background synchronization to a remote document store. The binary in
//! `main.rs` is a thin CLI over this library.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod output;
pub mod services;
