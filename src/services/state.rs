// src/services/state.rs

//! Warning level state machine.
//!
//! Folds each cycle's areas into the aggregate [`WarningLevel`] and decides
//! whether a notification fires. The previous level is the only cross-cycle
//! memory; it lives here as explicit state so the machine stays testable in
//! isolation.

use crate::models::{AreaRecord, NotificationEvent, WarningLevel};

/// Hysteresis state machine over the aggregate warning level.
#[derive(Debug, Default)]
pub struct WarningStateMachine {
    previous: WarningLevel,
}

impl WarningStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level observed on the previous cycle.
    pub fn previous(&self) -> WarningLevel {
        self.previous
    }

    /// Fold one cycle's areas into the machine.
    ///
    /// Returns the recomputed level and the notification to fire, if any:
    /// none -> pre/active fires `Onset`, pre -> active fires `Escalation`,
    /// pre/active -> none fires `Cleared`. Steady states and the
    /// active -> pre downgrade fire nothing. The previous level is updated
    /// unconditionally.
    pub fn observe(&mut self, areas: &[AreaRecord]) -> (WarningLevel, Option<NotificationEvent>) {
        let level = WarningLevel::from_areas(areas);

        let event = match (self.previous, level) {
            (WarningLevel::None, WarningLevel::Pre | WarningLevel::Active) => {
                Some(NotificationEvent::Onset)
            }
            (WarningLevel::Pre, WarningLevel::Active) => Some(NotificationEvent::Escalation),
            (WarningLevel::Pre | WarningLevel::Active, WarningLevel::None) => {
                Some(NotificationEvent::Cleared)
            }
            _ => None,
        };

        self.previous = level;
        (level, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeverityTier;

    fn areas_for(level: WarningLevel) -> Vec<AreaRecord> {
        let make = |tier: SeverityTier| AreaRecord {
            region: "Sintang".to_string(),
            tier,
            districts: vec!["Dedai".to_string()],
            coordinate: (0.07, 111.49),
            forecast: tier.forecast().to_string(),
            impacts: tier.impacts().iter().map(|s| s.to_string()).collect(),
        };
        match level {
            WarningLevel::None => vec![],
            WarningLevel::Pre => vec![make(SeverityTier::Advisory)],
            WarningLevel::Active => vec![make(SeverityTier::Critical)],
        }
    }

    fn run(machine: &mut WarningStateMachine, level: WarningLevel) -> Option<NotificationEvent> {
        machine.observe(&areas_for(level)).1
    }

    #[test]
    fn onset_escalation_cleared_sequence() {
        let mut machine = WarningStateMachine::new();

        let events: Vec<_> = [
            WarningLevel::None,
            WarningLevel::Pre,
            WarningLevel::Active,
            WarningLevel::None,
        ]
        .into_iter()
        .filter_map(|level| run(&mut machine, level))
        .collect();

        assert_eq!(
            events,
            [
                NotificationEvent::Onset,
                NotificationEvent::Escalation,
                NotificationEvent::Cleared
            ]
        );
    }

    #[test]
    fn steady_none_fires_nothing() {
        let mut machine = WarningStateMachine::new();
        assert_eq!(run(&mut machine, WarningLevel::None), None);
        assert_eq!(run(&mut machine, WarningLevel::None), None);
    }

    #[test]
    fn direct_onset_to_active() {
        let mut machine = WarningStateMachine::new();
        assert_eq!(
            run(&mut machine, WarningLevel::Active),
            Some(NotificationEvent::Onset)
        );
    }

    #[test]
    fn steady_active_and_downgrade_fire_nothing() {
        let mut machine = WarningStateMachine::new();
        run(&mut machine, WarningLevel::Active);
        assert_eq!(run(&mut machine, WarningLevel::Active), None);
        // active -> pre is a no-op notification
        assert_eq!(run(&mut machine, WarningLevel::Pre), None);
        assert_eq!(machine.previous(), WarningLevel::Pre);
    }

    #[test]
    fn cleared_from_pre() {
        let mut machine = WarningStateMachine::new();
        run(&mut machine, WarningLevel::Pre);
        assert_eq!(
            run(&mut machine, WarningLevel::None),
            Some(NotificationEvent::Cleared)
        );
    }

    #[test]
    fn previous_updates_unconditionally() {
        let mut machine = WarningStateMachine::new();
        run(&mut machine, WarningLevel::Pre);
        run(&mut machine, WarningLevel::Pre);
        assert_eq!(machine.previous(), WarningLevel::Pre);
    }
}
