pub mod config;
pub mod error;
pub mod markdown;
pub mod model;
pub mod remote;
pub mod session;
pub mod shell;
pub mod vfs;
