//! One-call task operations over a `Transport`.
//!
//! Each method builds the request with `TodoistClient`, executes it, and
//! parses the response. Validation failures surface before the transport is
//! touched: empty content on create/update and an empty task id on every
//! operation that addresses an existing task.

use crate::client::TodoistClient;
use crate::config::Config;
use crate::error::Result;
use crate::transport::{Transport, UreqTransport};
use crate::types::{QueryParam, Task};

/// Blocking task API: one network round-trip per call.
///
/// Generic over the `Transport` so tests can substitute a recorder.
#[derive(Debug, Clone)]
pub struct Todoist<T = UreqTransport> {
    client: TodoistClient,
    transport: T,
}

impl Todoist<UreqTransport> {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> Todoist<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            client: TodoistClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &TodoistClient {
        &self.client
    }

    /// All tasks matching `filter`. An empty filter lists every active task.
    pub fn list(&self, filter: &QueryParam) -> Result<Vec<Task>> {
        let response = self.transport.execute(self.client.build_list_tasks(filter))?;
        self.client.parse_list_tasks(response)
    }

    pub fn get(&self, id: &str) -> Result<Task> {
        let response = self.transport.execute(self.client.build_get_task(id)?)?;
        self.client.parse_get_task(response)
    }

    /// Create `task` remotely and return the server's copy, including the
    /// generated id.
    pub fn create(&self, task: &Task) -> Result<Task> {
        let request = self.client.build_create_task(task)?;
        let response = self.transport.execute(request)?;
        self.client.parse_create_task(response)
    }

    pub fn update(&self, task: &Task) -> Result<()> {
        let request = self.client.build_update_task(task)?;
        let response = self.transport.execute(request)?;
        self.client.parse_empty(response)
    }

    pub fn delete(&self, task: &Task) -> Result<()> {
        let request = self.client.build_delete_task(&task.id)?;
        let response = self.transport.execute(request)?;
        self.client.parse_empty(response)
    }

    /// Mark `task` done.
    pub fn close(&self, task: &Task) -> Result<()> {
        let request = self.client.build_close_task(&task.id)?;
        let response = self.transport.execute(request)?;
        self.client.parse_empty(response)
    }

    pub fn reopen(&self, task: &Task) -> Result<()> {
        let request = self.client.build_reopen_task(&task.id)?;
        let response = self.transport.execute(request)?;
        self.client.parse_empty(response)
    }
}
