//! CLI command implementations.

mod config;
mod doctor;
mod interactive;
mod list;
mod search;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use interactive::run_interactive;
pub use list::run_list;
pub use search::run_search;
pub use serve::run_serve;
