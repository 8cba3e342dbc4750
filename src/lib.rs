pub mod cli;
pub mod config;
pub mod ctx;
pub mod error;
pub mod geometry;
pub mod io;
pub mod math;
pub mod pipeline;
pub mod priors;
pub mod profile;
pub mod schema;
