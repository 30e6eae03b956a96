pub mod config;
pub mod handlers;
pub mod helpers;

pub use helpers::app_state::AppState;
