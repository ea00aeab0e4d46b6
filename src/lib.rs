pub mod auth;
pub mod cli;
pub mod config;
pub mod container;
pub mod errors;
pub mod models;
pub mod reporting;
pub mod scan;
