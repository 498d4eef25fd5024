pub mod app;
pub mod data;
pub mod graph;
pub mod util;

pub use app::{EventQueue, Interaction, Notice};
pub use graph::GraphState;
