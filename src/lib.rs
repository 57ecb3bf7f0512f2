pub mod client;
pub mod commands;
pub mod config;
pub mod fallback;
pub mod filters;
pub mod flow;
pub mod normalize;
pub mod output;
pub mod selection;
pub mod server;
pub mod tui;
