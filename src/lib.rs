pub mod color;
pub mod hue;
pub mod settings;
pub mod web;
