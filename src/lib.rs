//! Cell Arena simulation core
//!
//! A bounded 2D world of stationary cells and mobile creatures. Creatures grow
//! by absorbing cells and smaller creatures; the world advances one tick per
//! `WorldState::update` call.
//!
//! Rendering and input stay outside: the world issues draw calls through
//! `render::Renderer` and takes the pointer position as a plain vector.

pub mod config;
pub mod game;
pub mod metrics;
pub mod render;
pub mod util;
