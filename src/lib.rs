pub mod assets;
pub mod config;
pub mod document;
pub mod geometry;
pub mod gui;
pub mod icon;
pub mod interaction;
pub mod logging;
pub mod menu;
pub mod opacity;
pub mod screens;
pub mod settings;
pub mod state;
pub mod theme;
