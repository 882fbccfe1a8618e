// View model - Pure projection of dashboard state for rendering
use crate::domain::dashboard::{DashboardState, LoadStatus};
use crate::domain::metrics::{
    developer_concentration, stage_breakdown, submarket_risks, top_submarkets, whole_percent,
    DeveloperShare, SubmarketShare,
};
use crate::domain::metro::MetroCatalog;
use crate::domain::pipeline::{MetroData, Project};
use serde::Serialize;

pub const RETRY_HREF: &str = "/retry";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    pub metros: Vec<MetroOption>,
    pub view: DashboardView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetroOption {
    pub id: String,
    pub display: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardView {
    Loading { metro: String },
    Error { message: String, retry_href: String },
    Ready(Box<ReadyView>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadyView {
    pub metro: String,
    pub last_updated: String,
    pub total_projects: u64,
    pub summary: Vec<SummaryCard>,
    pub stages: Vec<StageBar>,
    pub top_submarkets: Vec<SubmarketShare>,
    pub risks: Vec<RiskRow>,
    pub developers: Vec<DeveloperShare>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageBar {
    pub label: &'static str,
    pub colour: &'static str,
    pub units: u64,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskRow {
    pub submarket: String,
    pub units: u64,
    pub percent: u32,
    pub risk: &'static str,
    pub colour: &'static str,
}

pub fn render(state: &DashboardState, catalog: &MetroCatalog) -> DashboardPage {
    let metros = catalog
        .all()
        .iter()
        .map(|m| MetroOption {
            id: m.id.clone(),
            display: m.display.clone(),
            selected: m.id == state.selected.id,
        })
        .collect();

    let view = match &state.status {
        LoadStatus::Loading => DashboardView::Loading {
            metro: state.selected.display.clone(),
        },
        LoadStatus::Failed(message) => DashboardView::Error {
            message: message.clone(),
            retry_href: RETRY_HREF.to_string(),
        },
        LoadStatus::Loaded(data) => DashboardView::Ready(Box::new(ready_view(&state.selected.display, data))),
    };

    DashboardPage { metros, view }
}

fn ready_view(metro: &str, data: &MetroData) -> ReadyView {
    let analytics = &data.analytics;

    let summary = vec![
        SummaryCard {
            title: "Total Pipeline Units",
            value: format_units(analytics.total_units),
            detail: format!("{} projects", format_units(analytics.total_projects)),
        },
        SummaryCard {
            title: "Delivering Next 12 Months",
            value: format_units(analytics.units_next_12_months),
            detail: format!(
                "{}% of pipeline",
                whole_percent(analytics.units_next_12_months, analytics.total_units)
            ),
        },
        SummaryCard {
            title: "Average Occupancy",
            value: format!("{:.1}%", analytics.average_occupancy_rate),
            detail: "Existing stabilized stock".to_string(),
        },
        SummaryCard {
            title: "Largest Project",
            value: format_units(analytics.largest_project_units),
            detail: "units".to_string(),
        },
    ];

    let stages = stage_breakdown(analytics)
        .into_iter()
        .map(|s| StageBar {
            label: s.stage.label(),
            colour: s.stage.colour(),
            units: s.units,
            percent: s.percent,
        })
        .collect();

    let risks = submarket_risks(analytics)
        .into_iter()
        .map(|r| RiskRow {
            submarket: r.name,
            units: r.units,
            percent: r.percent,
            risk: r.risk.label(),
            colour: r.risk.colour(),
        })
        .collect();

    ReadyView {
        metro: metro.to_string(),
        last_updated: data.config.last_updated.clone(),
        total_projects: analytics.total_projects,
        summary,
        stages,
        top_submarkets: top_submarkets(analytics),
        risks,
        developers: developer_concentration(analytics),
        projects: data.projects.clone(),
    }
}

/// 5750 -> "5,750"
pub fn format_units(units: u64) -> String {
    let digits = units.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
