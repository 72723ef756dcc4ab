pub mod config;
pub mod engine;
pub mod model;
pub mod preview;
pub mod sanitize;
pub mod tree;
pub mod validation;
