//! teapot-field
//!
//! A procedural demo scene for an instancing-oriented engine: a coarse grid of
//! teapots, a diamond-shaped cube field with a glass roof and two sparse,
//! randomly filled bands of cubes, all hanging off a scene node that spins
//! every frame. Rendering is left to the host; this crate produces the scene
//! graph and the per-instance data a renderer would upload.
//!
//! High-level modules
//! - `config`: engine parameters and demo settings, optionally read from TOML
//! - `context`: camera, projection, light, fog and octree settings
//! - `data_structures`: instances and the scene graph
//! - `flow`: demo lifecycle (init / update / key handling) and the headless loop
//! - `layout`: the procedural placement rules
//! - `populate`: instantiates a layout into the scene graph
//! - `resources`: mesh asset table and material palette
//!

pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod layout;
pub mod populate;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::keyboard::KeyCode;
