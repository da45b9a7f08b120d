//! Stardrift: an interactive star and asteroid particle backdrop.
//!
//! Asteroids drift and wrap around the window, stars pull them in and swallow
//! them, and the pointer can press and hold to charge a new star.  Stars age,
//! launch probes, clash with each other, and eventually burn out.

pub mod body;
pub mod cards;
pub mod config;
pub mod constants;
pub mod effects;
pub mod error;
pub mod events;
pub mod graphics;
pub mod hud;
pub mod input;
pub mod lifecycle;
pub mod palette;
pub mod physics;
pub mod rendering;
pub mod simulation;
pub mod sparks;
