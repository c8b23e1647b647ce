pub mod config;
pub mod error;
pub mod logging;

pub mod fetcher;
pub mod image_result;
pub mod output;
pub mod resize;
pub mod search;
