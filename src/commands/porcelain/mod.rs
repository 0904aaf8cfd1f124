//! Porcelain commands (user-facing history views)
//!
//! ## Commands
//!
//! - `log`: Show the date-filtered first-parent history
//! - `render`: Draw the date-filtered history as a graph image

pub mod log;
pub mod render;
