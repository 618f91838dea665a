#[macro_use]
extern crate log;

pub mod cli;
pub mod condition;
pub mod config;
pub mod io;
pub mod process;
