//! Dashboard widgets. Each one renders a borrowed slice of [`App`](super::App)
//! state and owns nothing.

pub mod banner;
pub mod chart;
pub mod header;
pub mod input;
pub mod sidebar;
pub mod table;
