// src/types.rs

use serde::Deserialize;

/// Run state of the host application (editor / build tool).
///
/// Hot reload is only eligible while the host is `Running`, unless
/// editor-mode hot reload has been enabled explicitly.
///
/// - `Editing`: the host is in its authoring mode (default).
/// - `EnteringRunning` / `ExitingRunning`: transitions; changes detected
///   while switching modes are not eligible.
/// - `Running`: the host is actively running the project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostRunState {
    #[default]
    Editing,
    EnteringRunning,
    Running,
    ExitingRunning,
}

/// Search pattern used when a watch entry does not specify one.
pub const DEFAULT_SEARCH_PATTERN: &str = "*";

/// Reference polling period (1 second).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        state: HostRunState,
    }

    #[test]
    fn run_state_deserializes_snake_case_and_defaults_to_editing() {
        let parsed: Holder = toml::from_str(r#"state = "exiting_running""#).unwrap();
        assert_eq!(parsed.state, HostRunState::ExitingRunning);
        assert!(toml::from_str::<Holder>(r#"state = "paused""#).is_err());
        assert_eq!(HostRunState::default(), HostRunState::Editing);
    }
}
