//! Session-based push client for the remote import API.
//!
//! Implements the authenticate → upload → register-job sequence against the
//! import service: a login call that yields a session cookie, a multipart
//! upload of the CSV payload, and a job-creation call referencing the
//! uploaded file. Each push owns its session; nothing is retried or shared
//! across calls.

pub mod client;
pub mod error;
pub mod session;

pub use client::{PushClient, PushOptions};
pub use error::{PushError, PushResult};
pub use session::PushSession;
