pub mod api;
pub mod auth;
pub mod blog_import;
pub mod calculator;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod leads;
pub mod logging;
pub mod notify;
pub mod seed;
pub mod server;
pub mod storage;
pub mod types;
pub mod validation;
