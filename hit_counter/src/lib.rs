#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod cli;
pub mod config;
pub mod counts;
pub mod hits;
pub mod input;
pub mod process;
