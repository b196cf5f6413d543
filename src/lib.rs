//! # Megaplan
//!
//! An asynchronous client for the Megaplan business-management API.
//!
//! Megaplan speaks form-encoded POST requests signed with HMAC-SHA1 and
//! answers with a JSON envelope. This crate hides both: parameters are
//! written in snake_case and converted to the vendor's PascalCase, results
//! come back in snake_case with timestamps normalized.
//!
//! ## Features
//!
//! - **Tasks and projects**: list, create, edit, comment, apply actions
//! - **Staff**: employees and departments
//! - **CRM and trade**: contractors, deals, online-store orders
//! - **Misc**: todo lists, events, search, history, server time
//! - **Security**: the secret key never appears in logs or `Debug` output
//!
//! ## Architecture
//!
//! - [`config`] - Server settings and environment configuration
//! - [`dicts`] - URI shortcuts, API enumerations and field labels
//! - [`utils`] - Key conversion, ID normalization, signing, form encoding
//! - [`request`] - A single prepared call and its send contract
//! - [`client`] - The facade that builds requests and tracks auth state
//! - [`params`] - Parameter structs for the fixed-shape operations
//! - [`models`] - Typed views over response payloads
//! - [`error`] - The error type and symbolic failure codes
//!
//! ## Configuration
//!
//! The demo binary reads:
//!
//! - `MEGAPLAN_HOST`: Megaplan account hostname
//! - `MEGAPLAN_LOGIN` / `MEGAPLAN_PASSWORD`, or
//!   `MEGAPLAN_ACCESS_ID` / `MEGAPLAN_SECRET_KEY` to resume a session
//!
//! Optional:
//! - `MEGAPLAN_PORT`, `MEGAPLAN_SCHEME`, `MEGAPLAN_BASIC_AUTH`
//! - `RUST_LOG`: Log level (e.g., `megaplan=debug`)
//!
//! ## Example
//!
//! ```ignore
//! use megaplan::{AuthParams, Client, Folder, ServerConfig, Task, TaskListParams};
//!
//! async fn example() -> Result<(), megaplan::MegaplanError> {
//!     let mut client = Client::new(ServerConfig::new("mycompany.megaplan.ru")?)?;
//!     client.auth(AuthParams::password("ivan", "secret")).await?;
//!
//!     let tasks: Vec<Task> = client
//!         .tasks(&TaskListParams::new().with_folder(Folder::Owner))?
//!         .send_as()
//!         .await?;
//!     for task in tasks {
//!         println!("#{}: {}", task.id, task.display_name());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod dicts;
pub mod error;
pub mod models;
pub mod params;
pub mod request;
pub mod utils;

pub use client::{AuthEvent, Client};
pub use config::{ServerConfig, ServerOptions};
pub use dicts::{ActionType, Folder, SortOrder, SubjectType, TaskStatus};
pub use error::MegaplanError;
pub use models::{Credentials, Task};
pub use params::{AuthParams, Deadline, HistoryParams, TaskCreateParams, TaskListParams};
pub use request::Request;
pub use utils::EntityId;
