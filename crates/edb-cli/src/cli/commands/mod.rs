//! One module per subcommand.

mod download;
mod hook;
mod submit;

pub use download::run_download;
pub use hook::run_hook;
pub use submit::run_submit;
