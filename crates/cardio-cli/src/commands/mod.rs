pub mod batch;
pub mod check;
pub mod demo;
pub mod predict;
