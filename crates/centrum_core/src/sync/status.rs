//! Per-module transient sync state.

/// Status flags consumed by the sidebar badge and the login boundary.
///
/// Created when a module becomes active and reset when another module is
/// selected; no granular error codes are exposed beyond these flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStatus {
    /// Local snapshot is believed to match the server.
    pub synchronized: bool,
    /// The last divergence contained genuinely new remote content, not just
    /// this device's own acknowledged edits.
    pub has_new_data: bool,
    /// A fetch/push cycle is currently running.
    pub sync_in_flight: bool,
    /// The session credential was purged; the login boundary must take over.
    pub auth_required: bool,
}

impl SyncStatus {
    /// Fresh state for a newly activated module.
    pub fn new() -> Self {
        Self::default()
    }
}
