pub use yamlstruct_core::{
    batch, config, directive, error, naming, render, scanner, session, types,
};

pub mod cli;
pub mod commands;
