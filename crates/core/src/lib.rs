pub mod config;
pub mod error;
pub mod model;
pub mod quiz;

pub use config::Config;
pub use error::*;
pub use model::*;
pub use quiz::*;
