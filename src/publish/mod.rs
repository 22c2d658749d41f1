//! Publishing the generated site through git

pub mod deploy;
pub mod shell;

pub use deploy::{deploy, DeployReport};
