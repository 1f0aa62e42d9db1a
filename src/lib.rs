//! EcoSort
//!
//! キーワード判定によるごみ分別。HTTP APIとCLIを提供する。

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod scanner;
pub mod server;
