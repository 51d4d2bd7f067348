pub mod bonus;
pub mod campaign;
pub mod config;
pub mod constants;
pub mod editing;
pub mod format;
pub mod logging;
