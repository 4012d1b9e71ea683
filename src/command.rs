//! Command parsing for the interactive shell.
//!
//! Input is matched by exact word comparison. The command word is lowercased;
//! an id argument keeps its case since Stonebranch ids are case-sensitive.

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List universal agents, optionally filtered by name.
    Agents,
    /// List tasks, optionally filtered by name.
    Tasks,
    /// List task instances, optionally filtered by task name.
    TaskInstances,
    /// Check API health.
    Health,
    /// Show the API documentation.
    Docs,
    /// Reprint the banner.
    Help,
    /// Exit the shell.
    Quit,
    /// Look up a single resource by id.
    Detail(Detail, String),
    /// Anything else.
    Unknown,
}

/// Resources that can be fetched by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    Agent,
    Task,
    TaskInstance,
    TaskInstanceDependencies,
    Workflow,
    WorkflowDependencies,
}

impl Detail {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "agent" => Some(Detail::Agent),
            "task" => Some(Detail::Task),
            "task-instance" => Some(Detail::TaskInstance),
            "task-instance-deps" => Some(Detail::TaskInstanceDependencies),
            "workflow" => Some(Detail::Workflow),
            "workflow-deps" => Some(Detail::WorkflowDependencies),
            _ => None,
        }
    }

    /// Path segments under `/api` for the resource with `id`.
    pub fn segments(self, id: &str) -> Vec<&str> {
        match self {
            Detail::Agent => vec!["agents", id],
            Detail::Task => vec!["tasks", id],
            Detail::TaskInstance => vec!["task-instances", id],
            Detail::TaskInstanceDependencies => vec!["task-instances", id, "dependencies"],
            Detail::Workflow => vec!["workflow-instances", id],
            Detail::WorkflowDependencies => vec!["workflow-instances", id, "dependencies"],
        }
    }

    /// Label used when printing the result.
    pub fn label(self) -> &'static str {
        match self {
            Detail::Agent => "Agent",
            Detail::Task => "Task",
            Detail::TaskInstance => "Task Instance",
            Detail::TaskInstanceDependencies => "Task Instance Dependencies",
            Detail::Workflow => "Workflow Instance",
            Detail::WorkflowDependencies => "Workflow Dependencies",
        }
    }
}

impl Command {
    /// Parse one line of input.
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Command::Unknown;
        };
        let word = first.to_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return Command::Unknown;
        }

        match (word.as_str(), arg) {
            ("agents", None) => Command::Agents,
            ("tasks", None) => Command::Tasks,
            ("task-instances", None) => Command::TaskInstances,
            ("health", None) => Command::Health,
            ("docs", None) => Command::Docs,
            ("help", None) => Command::Help,
            ("quit", None) => Command::Quit,
            // `.` and `..` are not ids; as path segments they would be dropped.
            (_, Some("." | "..")) => Command::Unknown,
            (word, Some(id)) => match Detail::from_word(word) {
                Some(detail) => Command::Detail(detail, id.to_string()),
                None => Command::Unknown,
            },
            _ => Command::Unknown,
        }
    }

    /// The `/api` path segments this command queries, if it touches the network.
    ///
    /// `health` lives outside `/api` and is reported as `None`.
    pub fn endpoint(&self) -> Option<Vec<&str>> {
        match self {
            Command::Agents => Some(vec!["agents"]),
            Command::Tasks => Some(vec!["tasks"]),
            Command::TaskInstances => Some(vec!["task-instances"]),
            Command::Docs => Some(vec!["docs"]),
            Command::Detail(detail, id) => Some(detail.segments(id)),
            Command::Health | Command::Help | Command::Quit | Command::Unknown => None,
        }
    }
}
