//! Megaplan demo driver.
//!
//! Logs in (or resumes a saved session), then walks through a few common
//! calls: owned tasks, quick search, employees, server time, and a new task
//! followed by its history.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `MEGAPLAN_HOST`: Megaplan account hostname
//! - `MEGAPLAN_LOGIN` and `MEGAPLAN_PASSWORD`, or
//!   `MEGAPLAN_ACCESS_ID` and `MEGAPLAN_SECRET_KEY`
//!
//! # Usage
//!
//! ```bash
//! MEGAPLAN_HOST=mycompany.megaplan.ru MEGAPLAN_LOGIN=ivan MEGAPLAN_PASSWORD=xxx ./megaplan
//! ```

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use megaplan::config::{Config, Login};
use megaplan::models::{Employee, Task};
use megaplan::{AuthParams, Client, Folder, HistoryParams, TaskCreateParams, TaskListParams};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("megaplan=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Megaplan client v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(host = config.server.hostname(), "Configuration loaded");

    let mut client = Client::new(config.server).context("Failed to create Megaplan client")?;

    match config.login {
        Login::Session {
            access_id,
            secret_key,
        } => client
            .set_credentials(access_id, secret_key)
            .context("Failed to resume session")?,
        Login::Password { login, password } => {
            let credentials = client
                .auth(AuthParams::password(login, password))
                .await
                .context("Authorization failed")?;
            tracing::info!(
                access_id = %credentials.access_id,
                employee_id = ?credentials.employee_id,
                "Authorized"
            );
        }
    }

    let tasks: Vec<Task> = client
        .tasks(&TaskListParams::new().with_folder(Folder::Owner))?
        .send_as()
        .await
        .context("Failed to list tasks")?;
    for task in &tasks {
        tracing::info!(id = %task.id, name = task.display_name(), "Owned task");
    }

    let found = client
        .search("test")?
        .send()
        .await
        .context("Search failed")?;
    tracing::info!(result = %found, "Quick search");

    let employees: Vec<Employee> = client
        .employees(&())?
        .pluck("employees")
        .send_as()
        .await
        .context("Failed to list employees")?;
    tracing::info!(count = employees.len(), "Employees");

    let now = client
        .datetime()?
        .send()
        .await
        .context("Failed to read server time")?;
    tracing::info!(datetime = %now, "Server time");

    let task: Task = client
        .task_create(
            &TaskCreateParams::new("Test task")
                .with_statement("Created by the Megaplan demo driver"),
        )?
        .send_as()
        .await
        .context("Failed to create task")?;
    tracing::info!(id = %task.id, "Task created");

    let task_id = task.id.parse::<u64>().context("Task id is not numeric")?;
    let changes = client
        .history(&HistoryParams::task(task_id))?
        .send()
        .await
        .context("Failed to load task history")?;
    tracing::info!(changes = %changes, "Task history");

    Ok(())
}
