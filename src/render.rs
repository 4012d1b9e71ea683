//! Text printed by the shell.

use serde_json::Value;

/// Greeting and command list shown at startup and on `help`.
pub fn banner() -> String {
    let lines = [
        "🤖 Stonebranch AI Assistant".to_string(),
        "=".repeat(50),
        "Available commands:".to_string(),
        "- 'agents' - List universal agents (requires agentname)".to_string(),
        "- 'tasks' - List tasks (requires taskname)".to_string(),
        "- 'task-instances' - List task instances (requires taskname)".to_string(),
        "- 'agent <id>' - Show agent details".to_string(),
        "- 'task <id>' - Show task details".to_string(),
        "- 'task-instance <id>' - Show task instance details".to_string(),
        "- 'task-instance-deps <id>' - Show task instance dependencies".to_string(),
        "- 'workflow <id>' - Show workflow instance details".to_string(),
        "- 'workflow-deps <id>' - Show workflow instance dependencies".to_string(),
        "- 'health' - Check API health".to_string(),
        "- 'docs' - Show API documentation".to_string(),
        "- 'help' - Show this list again".to_string(),
        "- 'quit' - Exit".to_string(),
        String::new(),
    ];
    lines.join("\n")
}

/// Guidance printed for input that is not a command.
pub fn fallback() -> &'static str {
    "🤔 I understand you want to know about Stonebranch.\n   \
     Try specific commands like 'health', 'agents', 'tasks', or 'task-instances'\n   \
     Your Stonebranch Universal Controller API is working!"
}

/// Strings print bare, everything else as JSON.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Status line for a `/health` response.
pub fn health(result: &Value) -> String {
    match (result.get("status"), result.get("timestamp")) {
        (Some(status), Some(timestamp)) => {
            format!("🟢 API Status: {} at {}", plain(status), plain(timestamp))
        }
        _ => {
            let reason = result
                .get("error")
                .map(plain)
                .unwrap_or_else(|| format!("unexpected response {}", result));
            format!("🔴 API unreachable: {}", reason)
        }
    }
}

/// Endpoint listing for a `/api/docs` response.
pub fn docs(result: &Value) -> String {
    let mut out = String::from("📋 Available API endpoints:");
    if let Some(endpoints) = result.get("endpoints").and_then(Value::as_array) {
        for endpoint in endpoints {
            out.push_str("\n  • ");
            out.push_str(&plain(endpoint));
        }
    }
    out
}

/// The `message` field of a response, for list calls made without a name.
pub fn message(result: &Value) -> String {
    let text = result
        .get("message")
        .map(plain)
        .unwrap_or_else(|| "No message".to_string());
    format!("ℹ️  {}", text)
}

/// A labelled, indented JSON dump.
pub fn labelled_json(label: &str, result: &Value) -> String {
    let pretty = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
    format!("{}: {}", label, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_ok() {
        let line = health(&json!({"status": "ok", "timestamp": "2024-01-01T00:00:00Z"}));
        assert_eq!(line, "🟢 API Status: ok at 2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_health_error() {
        let line = health(&json!({"error": "connection refused"}));
        assert_eq!(line, "🔴 API unreachable: connection refused");
    }

    #[test]
    fn test_health_missing_fields() {
        let line = health(&json!({"status": "ok"}));
        assert!(line.starts_with("🔴 API unreachable: unexpected response"));
    }

    #[test]
    fn test_docs_lists_endpoints() {
        let out = docs(&json!({"endpoints": ["GET /health - Health check", "GET /api/docs"]}));
        assert_eq!(
            out,
            "📋 Available API endpoints:\n  • GET /health - Health check\n  • GET /api/docs"
        );
    }

    #[test]
    fn test_docs_without_endpoints() {
        assert_eq!(docs(&json!({"error": "boom"})), "📋 Available API endpoints:");
    }

    #[test]
    fn test_message() {
        assert_eq!(message(&json!({"message": "agentname is required"})), "ℹ️  agentname is required");
        assert_eq!(message(&json!([])), "ℹ️  No message");
    }

    #[test]
    fn test_labelled_json_is_indented() {
        let out = labelled_json("🤖 Agent Result", &json!({"name": "PROD-AGENT-01"}));
        assert_eq!(out, "🤖 Agent Result: {\n  \"name\": \"PROD-AGENT-01\"\n}");
    }

    #[test]
    fn test_banner_lists_quit() {
        assert!(banner().contains("- 'quit' - Exit"));
        assert!(banner().starts_with("🤖 Stonebranch AI Assistant\n"));
    }
}
