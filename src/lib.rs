pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod grid;
pub mod local_storage;
pub mod messages;
pub mod pages;
pub mod services;
pub mod session;
pub mod shell;
pub mod storage;
pub mod theme;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod testing;
