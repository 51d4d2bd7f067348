pub mod errors;
pub mod filter;
pub mod state;
pub mod totals;
pub mod update;
