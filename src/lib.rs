pub mod api;
pub mod config;
pub mod i18n;
pub mod input;
pub mod logging;
pub mod model;
pub mod output;
pub mod paths;
pub mod request;
pub mod tui;
