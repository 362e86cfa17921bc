//! Relay behavior settings.

/// Settings that change how the relay treats rooms and cached state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayConfig {
    /// Drop a room's cached game / pomodoro state once its last member leaves.
    ///
    /// Off by default: a room recreated under the same code restores the
    /// previous state.
    pub purge_state_on_empty: bool,
}
