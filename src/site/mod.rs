//! Static site generation

pub mod builder;
pub mod images;
pub mod markdown;
pub mod minify;
pub mod watch;

pub use builder::build;
pub use watch::watch;
