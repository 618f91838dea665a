#[macro_use]
extern crate log;

pub mod cli;
pub mod config;
pub mod io;
pub mod metadata;
pub mod process;
