pub mod bands;
pub mod decision;
pub mod filters;
pub mod spectrum;
pub mod triggers;
pub mod window;
