pub mod filters;
pub mod reconcile;
pub mod screen;
