//! CLI subcommands.

pub mod batch;
pub mod export;
pub mod init;
pub mod preview;
pub mod serve;
