pub mod catalog;
pub mod config;
pub mod geo;
pub mod ranking;
pub mod util;
