//! Pipeline entry points for parkscout operations.
//!
//! - `Explorer::directory`: Build the region index
//! - `Explorer::facilities`: Extract every site listed for a region
//! - `Explorer::nearby`: Find places near one site

pub mod explorer;

pub use explorer::Explorer;
