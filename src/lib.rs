//! Huestrip - comic color maps
//!
//! Scrapes a webcomic, extracts the dominant colors of every page and
//! stacks them into a single color-map image.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
