pub mod agents;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod history;
pub mod models;
pub mod providers;
pub mod tool;
pub mod vector;
