pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod creation;
pub mod dashboard;
pub mod filter;
pub mod output;
pub mod patient;
pub mod render;
pub mod shell;
pub mod store;

#[cfg(test)]
mod tests;
