//! Data models for the Megaplan API.
//!
//! Typed views over normalized response payloads: credentials, tasks,
//! projects, staff and comments. Use them with
//! [`Request::send_as`](crate::request::Request::send_as).

mod common;
mod staff;
mod task;

pub use common::*;
pub use staff::*;
pub use task::*;
