pub mod add;
pub mod backup;
pub mod bill;
pub mod cache;
pub mod config;
pub mod del;
pub mod filters;
pub mod init;
pub mod list;
pub mod migrate;
