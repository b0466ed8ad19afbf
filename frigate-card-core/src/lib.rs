#![allow(clippy::new_without_default)]

pub mod action;
pub mod camera;
pub mod card;
pub mod condition;
pub mod config;
pub mod error;
pub mod gate;
pub mod hass;
pub mod host;
pub mod media;
pub mod menu;
pub mod message;
pub mod nav;
pub mod render;
pub mod runner;
pub mod timer;
pub mod util;
pub mod view;
