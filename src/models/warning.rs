// src/models/warning.rs

//! Warning snapshot data structures.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::messages;

/// Severity tier of a warned area.
///
/// `Critical` covers the bulletin's initial-impact block (AWAS),
/// `Advisory` the expanding-impact block (WASPADA). Independent of the
/// aggregate [`WarningLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Critical,
    Advisory,
}

impl SeverityTier {
    /// Fixed forecast template for this tier.
    pub fn forecast(&self) -> &'static str {
        match self {
            SeverityTier::Critical => "Hujan Sedang-Lebat, Petir, Angin Kencang",
            SeverityTier::Advisory => "Potensi Hujan Sedang-Lebat",
        }
    }

    /// Fixed impact templates for this tier.
    pub fn impacts(&self) -> &'static [&'static str] {
        match self {
            SeverityTier::Critical => {
                &["Jalan Licin", "Jarak Pandang Terbatas", "Potensi Genangan"]
            }
            SeverityTier::Advisory => &["Waspada Petir", "Angin Kencang Sesaat"],
        }
    }
}

/// One warned region extracted from a bulletin block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRecord {
    /// Regency/city name as written in the bulletin (trailing colon stripped)
    pub region: String,

    /// Severity tier of the block the region was found in
    pub tier: SeverityTier,

    /// District names in extraction order, never empty
    pub districts: Vec<String>,

    /// Regency centroid (lat, lon) from the gazetteer
    pub coordinate: (f64, f64),

    /// Forecast text, fixed per tier
    pub forecast: String,

    /// Impact texts, fixed per tier
    pub impacts: Vec<String>,
}

/// One fetch cycle's interpretation of the bulletin.
///
/// Replaces the previous snapshot wholesale on each successful parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningSnapshot {
    /// Bulletin date, rendered in the monitored zone
    pub date: String,

    /// Issue time, e.g. "16:15 WIB"
    pub time: String,

    /// End of the validity window, "-" when absent
    pub valid_until: String,

    /// Display summary (truncated bulletin text or a canonical message)
    pub summary: String,

    /// Warned areas, critical tier first, each in document order
    pub areas: Vec<AreaRecord>,
}

impl WarningSnapshot {
    /// Placeholder snapshot shown before the first successful cycle.
    pub fn connecting(now: DateTime<FixedOffset>) -> Self {
        Self {
            date: now.format("%d/%m/%Y").to_string(),
            time: "-".to_string(),
            valid_until: "-".to_string(),
            summary: messages::CONNECTING.to_string(),
            areas: Vec::new(),
        }
    }

    /// Snapshot for a bulletin page with no warning content.
    pub fn no_warning(now: DateTime<FixedOffset>, zone_label: &str) -> Self {
        Self {
            date: now.format("%d/%m/%Y").to_string(),
            time: format!("{} {}", now.format("%H:%M"), zone_label),
            valid_until: "-".to_string(),
            summary: messages::NO_WARNING.to_string(),
            areas: Vec::new(),
        }
    }

    /// Aggregate warning level derived from this snapshot's areas.
    pub fn level(&self) -> WarningLevel {
        WarningLevel::from_areas(&self.areas)
    }
}

/// Process-wide aggregate warning level.
///
/// A pure function of the latest snapshot's areas, recomputed every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    #[default]
    None,
    Pre,
    Active,
}

impl WarningLevel {
    /// Derive the level: `Active` iff any area is critical, `Pre` iff any
    /// area exists, `None` otherwise.
    pub fn from_areas(areas: &[AreaRecord]) -> Self {
        if areas.iter().any(|a| a.tier == SeverityTier::Critical) {
            WarningLevel::Active
        } else if areas.is_empty() {
            WarningLevel::None
        } else {
            WarningLevel::Pre
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WarningLevel::None => "none",
            WarningLevel::Pre => "pre",
            WarningLevel::Active => "active",
        }
    }
}

/// Side-channel event emitted by the state machine on a level transition.
///
/// Consumed by announcer/toast collaborators, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    /// First detection (none -> pre/active)
    Onset,
    /// Upgrade to the critical tier (pre -> active)
    Escalation,
    /// Condition lifted (pre/active -> none)
    Cleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(tier: SeverityTier) -> AreaRecord {
        AreaRecord {
            region: "Sintang".to_string(),
            tier,
            districts: vec!["Sintang".to_string()],
            coordinate: (0.07, 111.49),
            forecast: tier.forecast().to_string(),
            impacts: tier.impacts().iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn level_none_for_empty_areas() {
        assert_eq!(WarningLevel::from_areas(&[]), WarningLevel::None);
    }

    #[test]
    fn level_pre_without_critical() {
        let areas = vec![area(SeverityTier::Advisory), area(SeverityTier::Advisory)];
        assert_eq!(WarningLevel::from_areas(&areas), WarningLevel::Pre);
    }

    #[test]
    fn level_active_with_any_critical() {
        let areas = vec![area(SeverityTier::Advisory), area(SeverityTier::Critical)];
        assert_eq!(WarningLevel::from_areas(&areas), WarningLevel::Active);
    }

    #[test]
    fn connecting_snapshot_has_no_areas() {
        let now = chrono::Utc::now().with_timezone(&chrono::FixedOffset::east_opt(7 * 3600).unwrap());
        let snapshot = WarningSnapshot::connecting(now);
        assert!(snapshot.areas.is_empty());
        assert_eq!(snapshot.level(), WarningLevel::None);
        assert_eq!(snapshot.time, "-");
    }
}
