//! The interactive read loop.
//!
//! Reads one command per line, performs at most one API call for it, prints
//! the result and prompts again. The loop ends on `quit` or end of input.

use crate::client::ApiClient;
use crate::command::Command;
use crate::render;
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const PROMPT: &str = "👤 Ask about Stonebranch: ";
const AGENT_NAME_PROMPT: &str = "  📝 Enter agent name (or 'PROD-AGENT-01' for test): ";
const TASK_NAME_PROMPT: &str = "  📝 Enter task name: ";

/// A list command that takes an optional name filter.
struct ListQuery {
    endpoint: &'static str,
    name_prompt: &'static str,
    param: &'static str,
    label: &'static str,
}

const AGENTS: ListQuery = ListQuery {
    endpoint: "agents",
    name_prompt: AGENT_NAME_PROMPT,
    param: "agentname",
    label: "🤖 Agent Result",
};

const TASKS: ListQuery = ListQuery {
    endpoint: "tasks",
    name_prompt: TASK_NAME_PROMPT,
    param: "taskname",
    label: "⚙️  Task Result",
};

const TASK_INSTANCES: ListQuery = ListQuery {
    endpoint: "task-instances",
    name_prompt: TASK_NAME_PROMPT,
    param: "taskname",
    label: "📊 Task Instance Result",
};

/// Whether the loop should keep reading.
enum Flow {
    Continue,
    Exit,
}

/// Interactive shell over an input source and an output sink.
pub struct Shell<R, W> {
    client: ApiClient,
    input: R,
    output: W,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Create a new shell.
    pub fn new(client: ApiClient, input: R, output: W) -> Self {
        Self {
            client,
            input,
            output,
        }
    }

    /// Run until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{}", render::banner())?;

        loop {
            let Some(line) = self.prompt(PROMPT).await? else {
                debug!("end of input");
                return Ok(());
            };

            let command = Command::parse(&line);
            debug!(?command, endpoint = ?command.endpoint(), "dispatching");

            if let Flow::Exit = self.dispatch(command).await? {
                return Ok(());
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Quit => return Ok(Flow::Exit),
            Command::Health => {
                let result = self.client.call_path(&["health"]).await;
                writeln!(self.output, "{}", render::health(&result))?;
            }
            Command::Docs => {
                let result = self.client.call(&["docs"], &[]).await;
                writeln!(self.output, "{}", render::docs(&result))?;
            }
            Command::Agents => return self.list(&AGENTS).await,
            Command::Tasks => return self.list(&TASKS).await,
            Command::TaskInstances => return self.list(&TASK_INSTANCES).await,
            Command::Detail(detail, id) => {
                let result = self.client.call(&detail.segments(&id), &[]).await;
                let label = format!("🔎 {}", detail.label());
                writeln!(self.output, "{}", render::labelled_json(&label, &result))?;
            }
            Command::Help => writeln!(self.output, "{}", render::banner())?,
            Command::Unknown => writeln!(self.output, "{}", render::fallback())?,
        }
        Ok(Flow::Continue)
    }

    /// Ask for a name, then list with or without the filter.
    async fn list(&mut self, query: &ListQuery) -> Result<Flow> {
        let Some(name) = self.prompt(query.name_prompt).await? else {
            return Ok(Flow::Exit);
        };

        if name.is_empty() {
            let result = self.client.call(&[query.endpoint], &[]).await;
            writeln!(self.output, "{}", render::message(&result))?;
        } else {
            let result = self
                .client
                .call(&[query.endpoint], &[(query.param, name.as_str())])
                .await;
            writeln!(self.output, "{}", render::labelled_json(query.label, &result))?;
        }
        Ok(Flow::Continue)
    }

    /// Print `prompt` and read one line without its line terminator.
    /// Returns `None` at end of input.
    async fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .await
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}
