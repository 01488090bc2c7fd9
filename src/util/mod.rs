pub mod geometry;
pub mod logging;
pub mod process;
