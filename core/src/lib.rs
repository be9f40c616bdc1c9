//! Blocking client for the Todoist REST task API.
//!
//! # Overview
//! `TodoistClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. `Todoist` pairs it with a
//! `Transport` (by default `UreqTransport`) for one-call operations.
//!
//! # Design
//! - Authentication lives in an explicit `Config`, not in global state.
//! - Create/update bodies are derived from `Task` through `TaskPayload`,
//!   which omits zero-valued fields and refuses empty content.
//! - Every failure is an `ApiError`; remote rejections keep their status
//!   code and body.
//!
//! ```no_run
//! use todoist_core::{Config, QueryParam, Task, Todoist};
//!
//! # fn main() -> todoist_core::Result<()> {
//! let todoist = Todoist::new(Config::from_env()?);
//! let created = todoist.create(&Task::new("Buy milk"))?;
//! let inbox = todoist.list(&QueryParam::new().with("project_id", &created.project_id))?;
//! todoist.close(&created)?;
//! # let _ = inbox;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod tasks;
pub mod transport;
pub mod types;

pub use client::TodoistClient;
pub use config::Config;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use tasks::Todoist;
pub use transport::{Transport, UreqTransport};
pub use types::{Due, QueryParam, Task, TaskPayload};
