// Derived display metrics over an analytics payload
use super::pipeline::{Analytics, Stage, UnitTally};
use serde::Serialize;

pub const TOP_SUBMARKETS: usize = 5;
pub const RISK_SUBMARKETS: usize = 3;
pub const TOP_DEVELOPERS: usize = 5;

const HIGH_RISK_ABOVE: f64 = 30.0;
const MEDIUM_RISK_ABOVE: f64 = 20.0;

/// Share of `total` in percent, unrounded. Zero when `total` is zero.
pub fn concentration(units: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    units as f64 / total as f64 * 100.0
}

pub fn whole_percent(units: u64, total: u64) -> u32 {
    concentration(units, total).round() as u32
}

pub fn one_decimal_percent(units: u64, total: u64) -> f64 {
    (concentration(units, total) * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn colour(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Medium => "yellow",
            RiskLevel::High => "red",
        }
    }
}

/// Upper bounds are inclusive: exactly 20 is Low, exactly 30 is Medium.
pub fn classify_risk(concentration: f64) -> RiskLevel {
    if concentration > HIGH_RISK_ABOVE {
        RiskLevel::High
    } else if concentration > MEDIUM_RISK_ABOVE {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageShare {
    pub stage: Stage,
    pub units: u64,
    pub percent: u32,
}

pub fn stage_percentage(analytics: &Analytics, stage: Stage) -> u32 {
    let units = analytics.pipeline_by_stage.get(stage).unwrap_or(0);
    whole_percent(units, analytics.total_units)
}

/// Stages present in the payload, in lifecycle order
pub fn stage_breakdown(analytics: &Analytics) -> Vec<StageShare> {
    Stage::ALL
        .into_iter()
        .filter_map(|stage| {
            analytics.pipeline_by_stage.get(stage).map(|units| StageShare {
                stage,
                units,
                percent: stage_percentage(analytics, stage),
            })
        })
        .collect()
}

/// Entries sorted by unit count, largest first. Ties keep source order.
pub fn rank_by_units(tally: &UnitTally) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = tally
        .entries()
        .iter()
        .map(|(label, units)| (label.as_str(), *units))
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmarketShare {
    pub name: String,
    pub units: u64,
    pub percent: u32,
}

pub fn top_submarkets(analytics: &Analytics) -> Vec<SubmarketShare> {
    rank_by_units(&analytics.submarket_distribution)
        .into_iter()
        .take(TOP_SUBMARKETS)
        .map(|(name, units)| SubmarketShare {
            name: name.to_string(),
            units,
            percent: whole_percent(units, analytics.total_units),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmarketRisk {
    pub name: String,
    pub units: u64,
    pub concentration: f64,
    pub percent: u32,
    pub risk: RiskLevel,
}

pub fn submarket_risks(analytics: &Analytics) -> Vec<SubmarketRisk> {
    rank_by_units(&analytics.submarket_distribution)
        .into_iter()
        .take(RISK_SUBMARKETS)
        .map(|(name, units)| {
            let share = concentration(units, analytics.total_units);
            SubmarketRisk {
                name: name.to_string(),
                units,
                concentration: share,
                percent: whole_percent(units, analytics.total_units),
                risk: classify_risk(share),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeveloperShare {
    pub name: String,
    pub units: u64,
    pub percent: f64,
}

pub fn developer_concentration(analytics: &Analytics) -> Vec<DeveloperShare> {
    rank_by_units(&analytics.top_developers)
        .into_iter()
        .take(TOP_DEVELOPERS)
        .map(|(name, units)| DeveloperShare {
            name: name.to_string(),
            units,
            percent: one_decimal_percent(units, analytics.total_units),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::StageTally;

    fn analytics_with_total(total_units: u64) -> Analytics {
        Analytics {
            total_units,
            pipeline_by_stage: StageTally::from_iter([
                (Stage::Planning, 150),
                (Stage::Approved, 250),
                (Stage::UnderConstruction, 600),
            ]),
            submarket_distribution: UnitTally::from_iter([("A", 350), ("B", 200), ("C", 450)]),
            top_developers: UnitTally::from_iter([("Acme", 120), ("Birch", 80)]),
            ..Analytics::default()
        }
    }

    #[test]
    fn test_stage_percentages() {
        let analytics = analytics_with_total(1000);

        let shares: Vec<(Stage, u32)> = stage_breakdown(&analytics)
            .into_iter()
            .map(|s| (s.stage, s.percent))
            .collect();
        assert_eq!(
            shares,
            vec![
                (Stage::Planning, 15),
                (Stage::Approved, 25),
                (Stage::UnderConstruction, 60),
            ]
        );
        assert_eq!(stage_percentage(&analytics, Stage::Delivered), 0);
    }

    #[test]
    fn test_stage_order_ignores_source_order() {
        let analytics = Analytics {
            total_units: 100,
            pipeline_by_stage: StageTally::from_iter([
                (Stage::Delivered, 10),
                (Stage::Planning, 90),
            ]),
            ..Analytics::default()
        };

        let stages: Vec<Stage> = stage_breakdown(&analytics).iter().map(|s| s.stage).collect();
        assert_eq!(stages, vec![Stage::Planning, Stage::Delivered]);
    }

    #[test]
    fn test_zero_total_yields_zero_everywhere() {
        let analytics = analytics_with_total(0);

        assert!(stage_breakdown(&analytics).iter().all(|s| s.percent == 0));
        assert!(top_submarkets(&analytics).iter().all(|s| s.percent == 0));
        assert!(
            submarket_risks(&analytics)
                .iter()
                .all(|s| s.concentration == 0.0 && s.risk == RiskLevel::Low)
        );
        assert!(developer_concentration(&analytics).iter().all(|d| d.percent == 0.0));
    }

    #[test]
    fn test_classify_risk_boundaries() {
        assert_eq!(classify_risk(0.0), RiskLevel::Low);
        assert_eq!(classify_risk(20.0), RiskLevel::Low);
        assert_eq!(classify_risk(20.01), RiskLevel::Medium);
        assert_eq!(classify_risk(30.0), RiskLevel::Medium);
        assert_eq!(classify_risk(30.01), RiskLevel::High);
        assert_eq!(classify_risk(100.0), RiskLevel::High);
    }

    #[test]
    fn test_submarket_risk_scenario() {
        let analytics = analytics_with_total(1000);

        let risks: Vec<(String, u32, RiskLevel)> = submarket_risks(&analytics)
            .into_iter()
            .map(|r| (r.name, r.percent, r.risk))
            .collect();
        assert_eq!(
            risks,
            vec![
                ("C".to_string(), 45, RiskLevel::High),
                ("A".to_string(), 35, RiskLevel::Medium),
                ("B".to_string(), 20, RiskLevel::Low),
            ]
        );
    }

    #[test]
    fn test_top_submarkets_truncates_and_keeps_ties_in_order() {
        let analytics = Analytics {
            total_units: 700,
            submarket_distribution: UnitTally::from_iter([
                ("North", 100),
                ("South", 200),
                ("East", 100),
                ("West", 50),
                ("Central", 200),
                ("Harbor", 30),
                ("Hills", 20),
            ]),
            ..Analytics::default()
        };

        let names: Vec<String> = top_submarkets(&analytics).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["South", "Central", "North", "East", "West"]);
    }

    #[test]
    fn test_developer_concentration_rounds_to_one_decimal() {
        let analytics = Analytics {
            total_units: 3000,
            top_developers: UnitTally::from_iter([
                ("Small", 100),
                ("Large", 1000),
                ("Mid", 500),
                ("Tiny", 10),
                ("Mid Twin", 500),
                ("Sixth", 5),
            ]),
            ..Analytics::default()
        };

        let shares: Vec<(String, f64)> = developer_concentration(&analytics)
            .into_iter()
            .map(|d| (d.name, d.percent))
            .collect();
        assert_eq!(
            shares,
            vec![
                ("Large".to_string(), 33.3),
                ("Mid".to_string(), 16.7),
                ("Mid Twin".to_string(), 16.7),
                ("Small".to_string(), 3.3),
                ("Tiny".to_string(), 0.3),
            ]
        );
    }
}
