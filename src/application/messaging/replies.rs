//! Reply text for every command outcome

use std::fmt::Write;

use crate::application::services::{ActionOutcome, LifecycleAction, LogsOutcome};
use crate::domain::entities::ContainerSummary;

pub const UNAUTHORIZED: &str = "❌ Unauthorized access";
pub const UNKNOWN_COMMAND: &str = "❌ Unknown command. Use /help to see available commands.";
pub const RESTART_USAGE: &str = "❌ Usage: /restartcontainer <container_name_or_id>";
pub const LIST_FAILED: &str = "❌ Failed to list containers";
pub const NO_CONTAINERS: &str = "📦 No containers found";
pub const LOOKUP_FAILED: &str = "❌ Failed to check container status";

pub const HELP: &str = "🤖 *Available Commands:*

• */list* - List all containers
• */detailed* - List all containers with extra details
• */start* <name> - Start a container
• */stop* <name> - Stop a container
• */restart* <name> - Restart a container
• */logs* <name> [lines] - Show container logs (default: 10 lines, max: 1000)
• */help* - Show this help message
";

/// Longest reply sent before truncation kicks in
pub const MAX_REPLY_CHARS: usize = 4000;
pub const TRUNCATION_SUFFIX: &str = "\n...\n```\n\n⚠️ *Log output truncated due to length limit*";

/// Container listing, one line per container
pub fn container_list(containers: &[ContainerSummary], detailed: bool) -> String {
    if containers.is_empty() {
        return NO_CONTAINERS.to_string();
    }

    let mut response = String::from("📦 *Docker Containers:*\n\n");
    for container in containers {
        let status = match container.state.glyph() {
            Some(glyph) => format!("{} {}", glyph, container.status),
            None => "❓ Unknown".to_string(),
        };

        let _ = writeln!(response, "*{}* {}", container.display_name(), status);
        if detailed {
            let _ = write!(response, "{} (ID: {})\n\n", container.image, container.short_id());
        }
    }
    response
}

pub fn action(action: LifecycleAction, outcome: &ActionOutcome, name: &str) -> String {
    match (outcome, action) {
        (ActionOutcome::NotFound, _) => not_found(name),
        (ActionOutcome::LookupFailed, _) => LOOKUP_FAILED.to_string(),
        (ActionOutcome::AlreadyInState, LifecycleAction::Start) => {
            format!("ℹ️ Container `{}` is already running", name)
        }
        (ActionOutcome::AlreadyInState, _) => format!("ℹ️ Container `{}` is not running", name),
        (ActionOutcome::Failed, _) => {
            format!("❌ Failed to {} container `{}`", action.verb(), name)
        }
        (ActionOutcome::Completed, LifecycleAction::Start) => {
            format!("✅ Container `{}` started successfully", name)
        }
        (ActionOutcome::Completed, LifecycleAction::Stop) => {
            format!("✅ Container `{}` stopped successfully", name)
        }
        (ActionOutcome::Completed, LifecycleAction::Restart) => {
            format!("🔄 Container `{}` restarted successfully", name)
        }
    }
}

pub fn logs(outcome: &LogsOutcome, name: &str) -> String {
    match outcome {
        LogsOutcome::NotFound => not_found(name),
        LogsOutcome::LookupFailed => LOOKUP_FAILED.to_string(),
        LogsOutcome::Failed => format!("❌ Failed to get logs for container `{}`", name),
        LogsOutcome::Empty => format!("📋 No logs found for container `{}`", name),
        LogsOutcome::Found(excerpt) => truncate(format!(
            "📋 *Logs for container `{}`* (last {} lines):\n\n```\n{}```",
            name, excerpt.line_count, excerpt.text
        )),
    }
}

/// Cut a reply to [`MAX_REPLY_CHARS`] and close it with the truncation notice.
///
/// The cut may land inside a line or the code fence.
pub fn truncate(response: String) -> String {
    match response.char_indices().nth(MAX_REPLY_CHARS) {
        Some((cut, _)) => {
            let mut truncated = response[..cut].to_string();
            truncated.push_str(TRUNCATION_SUFFIX);
            truncated
        }
        None => response,
    }
}

fn not_found(name: &str) -> String {
    format!("❌ Container `{}` not found", name)
}
