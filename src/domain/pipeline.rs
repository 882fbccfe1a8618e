// Pipeline domain models: projects, analytics and per-metro config
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle phase of a project. Variant order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Planning,
    Approved,
    #[serde(rename = "Under Construction")]
    UnderConstruction,
    Delivered,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Planning,
        Stage::Approved,
        Stage::UnderConstruction,
        Stage::Delivered,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Planning => "Planning",
            Stage::Approved => "Approved",
            Stage::UnderConstruction => "Under Construction",
            Stage::Delivered => "Delivered",
        }
    }

    /// Colour token used for stage badges and bars
    pub fn colour(&self) -> &'static str {
        match self {
            Stage::Planning => "yellow",
            Stage::Approved => "blue",
            Stage::UnderConstruction => "green",
            Stage::Delivered => "purple",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("unknown stage '{0}'")]
pub struct UnknownStage(pub String);

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.label() == s)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_name: String,
    pub address: String,
    pub submarket: String,
    #[serde(deserialize_with = "positive_units")]
    pub units: u64,
    pub stage: Stage,
    pub estimated_delivery: String,
    pub developer: String,
}

fn positive_units<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match u64::deserialize(deserializer)? {
        0 => Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(0),
            &"a positive unit count",
        )),
        units => Ok(units),
    }
}

/// Unit counts keyed by label, kept in the order the source listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitTally(Vec<(String, u64)>);

impl UnitTally {
    pub fn entries(&self) -> &[(String, u64)] {
        &self.0
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, units)| *units)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, u64)> for UnitTally {
    fn from_iter<I: IntoIterator<Item = (L, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(l, u)| (l.into(), u)).collect())
    }
}

struct UnitTallyVisitor;

impl<'de> Visitor<'de> for UnitTallyVisitor {
    type Value = UnitTally;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of label to unit count")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, u64)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((label, units)) = access.next_entry::<String, u64>()? {
            // Later duplicates win, matching how a JSON object would be read
            if let Some(existing) = entries.iter_mut().find(|entry| entry.0 == label) {
                existing.1 = units;
            } else {
                entries.push((label, units));
            }
        }
        Ok(UnitTally(entries))
    }
}

impl<'de> Deserialize<'de> for UnitTally {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(UnitTallyVisitor)
    }
}

/// Units per stage. Every key must be a known stage label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageTally(Vec<(Stage, u64)>);

impl StageTally {
    pub fn get(&self, stage: Stage) -> Option<u64> {
        self.0.iter().find(|(s, _)| *s == stage).map(|(_, units)| *units)
    }

    pub fn entries(&self) -> &[(Stage, u64)] {
        &self.0
    }
}

impl FromIterator<(Stage, u64)> for StageTally {
    fn from_iter<I: IntoIterator<Item = (Stage, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for StageTally {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tally = UnitTally::deserialize(deserializer)?;
        tally
            .0
            .into_iter()
            .map(|(label, units)| {
                label
                    .parse::<Stage>()
                    .map(|stage| (stage, units))
                    .map_err(de::Error::custom)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Analytics {
    pub total_units: u64,
    pub total_projects: u64,
    pub units_next_12_months: u64,
    pub average_occupancy_rate: f64,
    pub largest_project_units: u64,
    pub pipeline_by_stage: StageTally,
    pub submarket_distribution: UnitTally,
    pub top_developers: UnitTally,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetroConfig {
    pub last_updated: String,
}

/// Everything loaded for one metro in a single load cycle
#[derive(Debug, Clone, PartialEq)]
pub struct MetroData {
    pub projects: Vec<Project>,
    pub analytics: Analytics,
    pub config: MetroConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_labels_round_trip_through_serde() {
        let stage: Stage = serde_json::from_value(json!("Under Construction")).unwrap();
        assert_eq!(stage, Stage::UnderConstruction);
        assert_eq!("Approved".parse::<Stage>().unwrap(), Stage::Approved);
        assert_eq!(
            "Demolished".parse::<Stage>().unwrap_err(),
            UnknownStage("Demolished".to_string())
        );
    }

    #[test]
    fn test_unit_tally_keeps_source_order() {
        let tally: UnitTally =
            serde_json::from_str(r#"{"Zeta": 10, "Alpha": 30, "Mid": 20}"#).unwrap();

        let labels: Vec<&str> = tally.entries().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(tally.get("Alpha"), Some(30));
        assert_eq!(tally.get("Missing"), None);
    }

    #[test]
    fn test_analytics_defaults_missing_fields() {
        let analytics: Analytics = serde_json::from_value(json!({
            "total_units": 1000,
            "pipeline_by_stage": { "Planning": 150, "Under Construction": 600 }
        }))
        .unwrap();

        assert_eq!(analytics.total_units, 1000);
        assert_eq!(analytics.total_projects, 0);
        assert_eq!(analytics.pipeline_by_stage.get(Stage::UnderConstruction), Some(600));
        assert_eq!(analytics.pipeline_by_stage.get(Stage::Approved), None);
        assert!(analytics.top_developers.is_empty());
    }

    #[test]
    fn test_analytics_rejects_unknown_stage_key() {
        let result = serde_json::from_value::<Analytics>(json!({
            "total_units": 10,
            "pipeline_by_stage": { "Rumoured": 10 }
        }));

        let message = result.unwrap_err().to_string();
        assert!(message.contains("unknown stage 'Rumoured'"), "{}", message);
    }

    #[test]
    fn test_project_decodes_from_feed_shape() {
        let project: Project = serde_json::from_value(json!({
            "project_name": "Santana Row Phase 4",
            "address": "3055 Olin Ave, San Jose",
            "submarket": "San Jose",
            "units": 1850,
            "stage": "Under Construction",
            "estimated_delivery": "Q3 2025",
            "developer": "Federal Realty Investment Trust"
        }))
        .unwrap();

        assert_eq!(project.units, 1850);
        assert_eq!(project.stage, Stage::UnderConstruction);
    }

    #[test]
    fn test_project_rejects_zero_units() {
        let result: Result<Project, _> = serde_json::from_value(json!({
            "project_name": "Empty Lot",
            "address": "1 Main St",
            "submarket": "Downtown",
            "units": 0,
            "stage": "Planning",
            "estimated_delivery": "Q4 2026",
            "developer": "Acme Housing"
        }));

        let message = result.unwrap_err().to_string();
        assert!(message.contains("a positive unit count"), "{}", message);
    }
}
