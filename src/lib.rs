pub mod api;
pub mod config;
pub mod matching;
pub mod models;
pub mod normalize;
pub mod pages;
pub mod present;
pub mod ui;
pub mod workers;
