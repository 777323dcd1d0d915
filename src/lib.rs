//! Gamepad to keyboard and mouse remapper
//!
//! Compiles a small binding file and runs a poll loop that fires keyboard, mouse
//! and scroll actions for the gamepad signals that are active.

pub mod controller;
pub mod mapping;
pub mod settings;
