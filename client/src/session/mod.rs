pub mod reconciler;
pub mod state;

pub use reconciler::*;
pub use state::*;
