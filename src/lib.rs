pub mod commands;
pub mod config;
pub mod conflict;
pub mod emit;
pub mod error;
pub mod hunk;
pub mod merge;
pub mod resolver;
pub mod scan;
pub mod stage;
