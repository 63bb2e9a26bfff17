pub mod config;
pub mod entity;
pub mod error;
pub mod role;

pub use config::Config;
pub use entity::*;
pub use error::*;
pub use role::{Access, AccessPolicy, Capability, Role};
