//! Client for the discussion thread service.
//!
//! Webtidy projects can attach a discussion thread to formatting
//! sessions. The service speaks two endpoints, `createThread` and
//! `closeThread`; requests are fire-and-forget and the response body is
//! never read. Operations are exposed through [`User`] and [`Admin`]
//! rather than on the client directly, so the capability split (only
//! admins close threads) is carried by the types.

pub mod actor;
pub mod client;

pub use actor::{Admin, User};
pub use client::{ThreadClient, ThreadError};
