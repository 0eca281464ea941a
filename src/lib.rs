pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod join;
pub mod model;
pub mod output;
pub mod parser;
pub mod source;
pub mod stats;
