use serde::Serialize;

use crate::{
    config::{PointsConfig, ScanConfig},
    inventory::{BatteryId, BatteryKind},
};

/// Fields used for a battery registered from a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryTemplate {
    pub kind: BatteryKind,
    pub brand: String,
    pub location: String,
}

/// What a recognised payload asks the engine to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanAction {
    RegisterBattery(BatteryTemplate),
    ValidateCollectionPoint { points: u32 },
    RegisterEvent { points: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRule {
    pub marker: String,
    pub action: ScanAction,
}

impl ScanRule {
    pub fn new(marker: &str, action: ScanAction) -> Self {
        Self {
            marker: marker.to_string(),
            action,
        }
    }

    pub fn matches(&self, payload: &str) -> bool {
        payload.contains(self.marker.as_str())
    }
}

/// Result of processing a scanned payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    BatteryRegistered { battery_id: BatteryId },
    PointValidated { points_awarded: u32, leveled_up: bool },
    EventRegistered { points_awarded: u32, leveled_up: bool },
    /// No rule matched; nothing changed
    Unrecognized,
}

/// Ordered rule table; the first rule whose marker occurs in the payload wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanClassifier {
    rules: Vec<ScanRule>,
}

impl ScanClassifier {
    pub fn new(rules: Vec<ScanRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(scan: &ScanConfig, points: &PointsConfig) -> Self {
        Self::new(vec![
            ScanRule::new(
                &scan.battery_marker,
                ScanAction::RegisterBattery(BatteryTemplate {
                    kind: scan.default_kind,
                    brand: scan.default_brand.clone(),
                    location: scan.default_location.clone(),
                }),
            ),
            ScanRule::new(
                &scan.collection_point_marker,
                ScanAction::ValidateCollectionPoint {
                    points: points.collection_point_award,
                },
            ),
            ScanRule::new(
                &scan.event_marker,
                ScanAction::RegisterEvent {
                    points: points.event_award,
                },
            ),
        ])
    }

    pub fn rules(&self) -> &[ScanRule] {
        &self.rules
    }

    pub fn classify(&self, payload: &str) -> Option<&ScanAction> {
        self.rules
            .iter()
            .find(|rule| rule.matches(payload))
            .map(|rule| &rule.action)
    }
}

impl Default for ScanClassifier {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default(), &PointsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_order() {
        let classifier = ScanClassifier::default();
        let markers: Vec<_> = classifier.rules().iter().map(|r| r.marker.as_str()).collect();
        assert_eq!(markers, vec!["battery-", "recycling-point-", "event-"]);
    }

    #[test]
    fn test_classify_each_marker() {
        let classifier = ScanClassifier::default();
        assert!(matches!(
            classifier.classify("battery-XYZ"),
            Some(ScanAction::RegisterBattery(_))
        ));
        assert_eq!(
            classifier.classify("recycling-point-42"),
            Some(&ScanAction::ValidateCollectionPoint { points: 10 })
        );
        assert_eq!(
            classifier.classify("event-fete-des-lumieres"),
            Some(&ScanAction::RegisterEvent { points: 20 })
        );
        assert_eq!(classifier.classify("unknown-code"), None);
        assert_eq!(classifier.classify(""), None);
    }

    #[test]
    fn test_marker_matches_anywhere() {
        let classifier = ScanClassifier::default();
        assert_eq!(
            classifier.classify("https://pilego.fr/q/recycling-point-7"),
            Some(&ScanAction::ValidateCollectionPoint { points: 10 })
        );
    }

    #[test]
    fn test_first_match_wins() {
        let classifier = ScanClassifier::default();
        // Contains both the event and the battery marker
        assert!(matches!(
            classifier.classify("event-battery-drive"),
            Some(ScanAction::RegisterBattery(_))
        ));
        assert_eq!(
            classifier.classify("event-recycling-point-3"),
            Some(&ScanAction::ValidateCollectionPoint { points: 10 })
        );
    }

    #[test]
    fn test_custom_table_order_is_respected() {
        let classifier = ScanClassifier::new(vec![
            ScanRule::new("event-", ScanAction::RegisterEvent { points: 5 }),
            ScanRule::new("battery-", ScanAction::ValidateCollectionPoint { points: 1 }),
        ]);
        assert_eq!(
            classifier.classify("event-battery-drive"),
            Some(&ScanAction::RegisterEvent { points: 5 })
        );
    }
}
