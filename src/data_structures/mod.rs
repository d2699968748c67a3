//! Scene data structures: instances and the scene graph.
//!
//! - `instance` holds per-instance transformation data and its packed form
//! - `scene_graph` enables hierarchical scene organization and instanced batches

pub mod instance;
pub mod scene_graph;
