pub mod config;
pub mod errors;
pub mod helpers;
pub mod images;
pub mod logger;
