pub mod classify;
pub mod config;
pub mod error;
pub mod git;
pub mod publish;
pub mod remote;
pub mod sequence;
pub mod ui;
pub mod verify;
pub mod version_map;

pub use error::{Result, TagflowError};
