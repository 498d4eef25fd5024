pub mod edges;
pub mod interaction;
pub mod jitter;
pub mod layout;
pub mod model;
pub mod search;
pub mod state;
pub mod tree;
pub mod visibility;

pub use interaction::InteractionError;
pub use layout::{Layout, LayoutConfig};
pub use state::GraphState;
pub use visibility::ExpandedSet;
