//! Wireframe 3D city skylines with weather and a day/night cycle.
//!
//! The core turns a camera, a scene and the weather state into an ordered
//! list of 2D [`primitive::Primitive`]s. The [`widget`] and [`graphics`]
//! modules put that list on a terminal.

pub mod camera;
pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod geometry;
pub mod graphics;
pub mod logging;
pub mod math;
pub mod palette;
pub mod primitive;
pub mod projection;
pub mod render;
pub mod scene;
pub mod state;
pub mod vertex;
pub mod weather;
pub mod widget;
