/// Lines returned by `/logs` when no valid count is given
pub const DEFAULT_LOG_LINES: usize = 10;

/// Largest accepted `/logs` line count
pub const MAX_LOG_LINES: usize = 1000;

/// Commands advertised in the chat client's command menu
pub const COMMAND_MENU: &[(&str, &str)] = &[
    ("status", "List all containers"),
    ("list", "List all containers"),
    ("detailed", "List all containers with extra details"),
    ("start", "Start a container"),
    ("stop", "Stop a container"),
    ("restart", "Restart a container"),
    ("logs", "Show container logs"),
    ("help", "Show help message"),
];

/// A command recognised from the first token of an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/status`, `/list`, `/detailed`, or a lifecycle command missing its argument
    List { detailed: bool },
    Start { container: String },
    Stop { container: String },
    Restart { container: String },
    /// `/restart` without a container argument
    RestartUsage,
    Logs { container: String, lines: usize },
    Help,
    Unknown { name: String },
}

impl Command {
    /// Parse message text into a command.
    ///
    /// Returns `None` when the text holds no tokens at all. Matching is
    /// case-sensitive and only the first token selects the command.
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let name = tokens.next()?;
        let target = tokens.next().map(str::to_string);

        let command = match (name, target) {
            ("/status" | "/list", _) => Command::List { detailed: false },
            ("/detailed", _) => Command::List { detailed: true },
            ("/start", Some(container)) => Command::Start { container },
            ("/stop", Some(container)) => Command::Stop { container },
            ("/start" | "/stop" | "/logs", None) => Command::List { detailed: false },
            ("/restart", Some(container)) => Command::Restart { container },
            ("/restart", None) => Command::RestartUsage,
            ("/logs", Some(container)) => Command::Logs {
                container,
                lines: parse_line_count(tokens.next()),
            },
            ("/help", _) => Command::Help,
            (other, _) => Command::Unknown { name: other.to_string() },
        };

        Some(command)
    }

    pub fn name(&self) -> &str {
        match self {
            Command::List { detailed: false } => "list",
            Command::List { detailed: true } => "detailed",
            Command::Start { .. } => "start",
            Command::Stop { .. } => "stop",
            Command::Restart { .. } | Command::RestartUsage => "restart",
            Command::Logs { .. } => "logs",
            Command::Help => "help",
            Command::Unknown { name } => name,
        }
    }
}

/// Invalid or out-of-range counts silently fall back to the default.
fn parse_line_count(token: Option<&str>) -> usize {
    token
        .and_then(|t| t.parse::<i64>().ok())
        .filter(|n| (1..=MAX_LOG_LINES as i64).contains(n))
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_LOG_LINES)
}
