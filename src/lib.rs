pub mod action;
pub mod app;
pub mod clipboard;
pub mod config;
pub mod domain;
pub mod event;
pub mod export;
pub mod input;
pub mod manager;
pub mod payload;
pub mod store;
pub mod theme;
pub mod tui;
pub mod widgets;
