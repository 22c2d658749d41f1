//! Core functionality: configuration, project layout, content files and slugs

pub mod config;
pub mod content;
pub mod document;
pub mod file_system;
pub mod project;
pub mod slug;
