//! Browser-side chat state, kept separate from rendering.

mod view;

pub use view::{Entry, Origin, ViewError, ViewState};
