pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod geo;
pub mod inventory;
pub mod rewards;
pub mod scan;
pub mod seed;
pub mod utils;

pub use crate::config::Config;
pub use crate::engine::RecyclingEngine;
pub use crate::error::{PileError, Result};
