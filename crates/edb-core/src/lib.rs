pub mod config;
pub mod logging;

pub mod dispatcher;
pub mod download;
pub mod error;
pub mod hook;
pub mod job;
pub mod primary;
pub mod progress;
pub mod supervisor;
pub mod watch;
