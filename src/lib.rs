pub mod cli;
pub mod config;
pub mod damage;
pub mod data;
pub mod logging;
pub mod server;
