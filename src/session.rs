// ABOUTME: Per-role connection state tracking for the source and target slots
// ABOUTME: Guards duplicate in-flight attempts and recomputes transfer readiness

use std::fmt;

use crate::error::TransferToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Source,
    Target,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::Source => write!(f, "source"),
            Role::Target => write!(f, "target"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Testing,
    Connected,
    Failed(String),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

#[derive(Debug, Default)]
struct RoleSlot {
    state: ConnectionState,
    // State to return to after a probe; a probe never promotes to Connected.
    resume: Option<ConnectionState>,
}

/// Single writer for both role states. Transitions happen only through
/// explicit operator actions; nothing reverts on its own.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    source: RoleSlot,
    target: RoleSlot,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, role: Role) -> &RoleSlot {
        match role {
            Role::Source => &self.source,
            Role::Target => &self.target,
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut RoleSlot {
        match role {
            Role::Source => &mut self.source,
            Role::Target => &mut self.target,
        }
    }

    pub fn state(&self, role: Role) -> &ConnectionState {
        &self.slot(role).state
    }

    /// Marks an attempt (test or connect) as in flight. A second attempt for
    /// the same role while one is outstanding is rejected, not queued.
    pub fn begin_attempt(&mut self, role: Role) -> Result<(), TransferToolError> {
        let slot = self.slot_mut(role);
        if slot.state == ConnectionState::Testing {
            return Err(TransferToolError::Connectivity(format!(
                "A {} connection attempt is already in progress",
                role
            )));
        }
        slot.resume = Some(std::mem::replace(&mut slot.state, ConnectionState::Testing));
        Ok(())
    }

    /// Ends a probe. Probes are side-effect free: the slot returns to
    /// whatever state it held before, regardless of the probe result.
    pub fn finish_test(&mut self, role: Role) {
        let slot = self.slot_mut(role);
        slot.state = slot.resume.take().unwrap_or(ConnectionState::Disconnected);
    }

    /// Ends a connect attempt with its outcome.
    pub fn finish_connect(&mut self, role: Role, success: bool, message: &str) {
        let slot = self.slot_mut(role);
        slot.resume = None;
        slot.state = if success {
            ConnectionState::Connected
        } else {
            ConnectionState::Failed(message.to_string())
        };
    }

    /// Pure readiness function: both roles connected and something selected.
    pub fn is_transfer_ready(&self, selection_nonempty: bool) -> bool {
        self.source.state.is_connected() && self.target.state.is_connected() && selection_nonempty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with(source_ok: bool, target_ok: bool) -> ConnectionManager {
        let mut mgr = ConnectionManager::new();
        if source_ok {
            mgr.begin_attempt(Role::Source).unwrap();
            mgr.finish_connect(Role::Source, true, "ok");
        }
        if target_ok {
            mgr.begin_attempt(Role::Target).unwrap();
            mgr.finish_connect(Role::Target, true, "ok");
        }
        mgr
    }

    #[test]
    fn readiness_requires_all_three_conditions() {
        for source_ok in [false, true] {
            for target_ok in [false, true] {
                for has_selection in [false, true] {
                    let mgr = manager_with(source_ok, target_ok);
                    assert_eq!(
                        mgr.is_transfer_ready(has_selection),
                        source_ok && target_ok && has_selection,
                        "source={} target={} selection={}",
                        source_ok,
                        target_ok,
                        has_selection
                    );
                }
            }
        }
    }

    #[test]
    fn probe_never_promotes_to_connected() {
        let mut mgr = ConnectionManager::new();
        mgr.begin_attempt(Role::Source).unwrap();
        assert_eq!(*mgr.state(Role::Source), ConnectionState::Testing);
        mgr.finish_test(Role::Source);
        assert_eq!(*mgr.state(Role::Source), ConnectionState::Disconnected);
    }

    #[test]
    fn probe_restores_prior_connected_state() {
        let mut mgr = manager_with(true, false);
        mgr.begin_attempt(Role::Source).unwrap();
        mgr.finish_test(Role::Source);
        assert_eq!(*mgr.state(Role::Source), ConnectionState::Connected);
    }

    #[test]
    fn failed_connect_records_message() {
        let mut mgr = ConnectionManager::new();
        mgr.begin_attempt(Role::Target).unwrap();
        mgr.finish_connect(Role::Target, false, "access denied");
        assert_eq!(
            *mgr.state(Role::Target),
            ConnectionState::Failed("access denied".to_string())
        );
        assert!(!mgr.is_transfer_ready(true));
    }

    #[test]
    fn duplicate_inflight_attempt_is_rejected() {
        let mut mgr = ConnectionManager::new();
        mgr.begin_attempt(Role::Source).unwrap();
        assert!(mgr.begin_attempt(Role::Source).is_err());
        // The other role is unaffected.
        assert!(mgr.begin_attempt(Role::Target).is_ok());
    }
}
