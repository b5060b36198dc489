//! Container metadata as reported by the engine

/// Length of the abbreviated container identifier
pub const SHORT_ID_LEN: usize = 12;

/// Lifecycle state of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Exited,
    Removing,
    Dead,
    Created,
    Restarting,
    Paused,
    Unknown,
}

impl ContainerState {
    pub fn from_engine(state: &str) -> Self {
        match state {
            "running" => ContainerState::Running,
            "exited" => ContainerState::Exited,
            "removing" => ContainerState::Removing,
            "dead" => ContainerState::Dead,
            "created" => ContainerState::Created,
            "restarting" => ContainerState::Restarting,
            "paused" => ContainerState::Paused,
            _ => ContainerState::Unknown,
        }
    }

    /// Status glyph, or `None` for states the engine did not name
    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            ContainerState::Running => Some("✅"),
            ContainerState::Exited => Some("⛔"),
            ContainerState::Removing => Some("⛏️"),
            ContainerState::Dead => Some("💀"),
            ContainerState::Created => Some("📄"),
            ContainerState::Restarting => Some("♻️"),
            ContainerState::Paused => Some("⏸️"),
            ContainerState::Unknown => None,
        }
    }
}

/// One container from an engine listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    pub names: Vec<String>,
    pub state: ContainerState,
    pub status: String,
    pub image: String,
}

impl ContainerSummary {
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(SHORT_ID_LEN) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }

    /// First engine name with one leading `/` removed; the short id when the
    /// engine reports no names.
    pub fn display_name(&self) -> &str {
        match self.names.first() {
            Some(name) => name.strip_prefix('/').unwrap_or(name),
            None => self.short_id(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == ContainerState::Running
    }

    /// Whether `target` names this container by display name, short id or full id
    pub fn matches(&self, target: &str) -> bool {
        self.display_name() == target || self.short_id() == target || self.id == target
    }
}

#[cfg(test)]
impl ContainerSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>, state: ContainerState) -> Self {
        Self {
            id: id.into(),
            names: vec![name.into()],
            state,
            status: String::new(),
            image: String::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// Find the first container answering to `target`, in listing order
pub fn find_container<'a>(containers: &'a [ContainerSummary], target: &str) -> Option<&'a ContainerSummary> {
    containers.iter().find(|c| c.matches(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FULL_ID: &str = "abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890";

    fn web() -> ContainerSummary {
        ContainerSummary {
            id: FULL_ID.to_string(),
            names: vec!["/web".to_string()],
            state: ContainerState::Running,
            status: "Up 2 hours".to_string(),
            image: "nginx:latest".to_string(),
        }
    }

    #[rstest]
    #[case("web")]
    #[case("abcdef123456")]
    #[case(FULL_ID)]
    fn resolves_by_name_short_id_or_full_id(#[case] target: &str) {
        let containers = vec![
            ContainerSummary::new("ffff00001111", "/db", ContainerState::Exited),
            web(),
        ];
        let found = find_container(&containers, target).map(|c| c.id.as_str());
        assert_eq!(found, Some(FULL_ID));
    }

    #[test]
    fn unknown_target_is_not_found() {
        let containers = vec![web()];
        assert!(find_container(&containers, "nonexistent").is_none());
        assert!(find_container(&containers, "/web").is_none());
        assert!(find_container(&containers, "abcdef").is_none());
    }

    #[test]
    fn only_one_leading_separator_is_stripped() {
        let c = ContainerSummary::new(FULL_ID, "//odd", ContainerState::Created);
        assert_eq!(c.display_name(), "/odd");
    }

    #[test]
    fn nameless_container_displays_short_id() {
        let mut c = web();
        c.names.clear();
        assert_eq!(c.display_name(), "abcdef123456");
    }

    #[test]
    fn short_id_of_short_identifier_is_whole_id() {
        let c = ContainerSummary::new("abc", "x", ContainerState::Dead);
        assert_eq!(c.short_id(), "abc");
    }

    #[rstest]
    #[case("running", ContainerState::Running, Some("✅"))]
    #[case("exited", ContainerState::Exited, Some("⛔"))]
    #[case("removing", ContainerState::Removing, Some("⛏️"))]
    #[case("dead", ContainerState::Dead, Some("💀"))]
    #[case("created", ContainerState::Created, Some("📄"))]
    #[case("restarting", ContainerState::Restarting, Some("♻️"))]
    #[case("paused", ContainerState::Paused, Some("⏸️"))]
    #[case("", ContainerState::Unknown, None)]
    #[case("Running", ContainerState::Unknown, None)]
    fn maps_engine_state_to_glyph(
        #[case] raw: &str,
        #[case] state: ContainerState,
        #[case] glyph: Option<&str>,
    ) {
        assert_eq!(ContainerState::from_engine(raw), state);
        assert_eq!(state.glyph(), glyph);
    }
}
