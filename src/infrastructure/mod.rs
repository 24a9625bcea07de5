pub mod config;
pub mod http;
pub mod rate_limit;
pub mod repositories;
