#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod pages;
pub mod state;
pub mod utils;
pub mod widgets;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod test_utils;

pub use app::RosterApp;
