//! HTTP client for the car-wash backend.
//!
//! Every endpoint answers with the same envelope
//! (`{ success, data?, error?, status? }`, see [`ApiEnvelope`]). Calls take
//! an explicit [`SessionContext`] instead of reading a global token store:
//! the session is set at login, cleared at logout, and cleared whenever the
//! backend answers 401.

pub mod client;
pub mod envelope;
pub mod error;
pub mod resources;
pub mod session;

pub use client::ApiClient;
pub use envelope::ApiEnvelope;
pub use error::ClientError;
pub use resources::{LoginResponse, ScheduleReceipt};
pub use session::{Session, SessionContext};
