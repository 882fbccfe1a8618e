// Server-rendered HTML for the dashboard page
use crate::presentation::view::{format_units, DashboardPage, DashboardView, ReadyView};
use std::fmt::Write as _;

const STYLE: &str = r#"
body{margin:0;font-family:system-ui,sans-serif;background:#111827;color:#f3f4f6}
header{display:flex;justify-content:space-between;align-items:center;padding:1rem 2rem;border-bottom:1px solid #374151}
main{padding:1.5rem 2rem}
a{color:#60a5fa}
.metros form,.status form{display:inline}
button{font:inherit;cursor:pointer;background:none;border:none;padding:0;color:#60a5fa}
.metros button{margin-left:.75rem;color:#9ca3af}
.metros button.selected{color:#60a5fa;border-bottom:2px solid #3b82f6}
.cards{display:grid;grid-template-columns:repeat(4,1fr);gap:1rem}
.card{background:#1f2937;border-radius:.5rem;padding:1rem}
.card .value{font-size:1.75rem;font-weight:700}
.muted{color:#9ca3af;font-size:.85rem}
.panels{display:grid;grid-template-columns:repeat(2,1fr);gap:1rem;margin-top:1rem}
.bar{background:#374151;border-radius:.25rem;height:.6rem;margin:.25rem 0 .75rem}
.bar span{display:block;height:100%;border-radius:.25rem}
.yellow{background:#eab308}.blue{background:#3b82f6}.green{background:#22c55e}.purple{background:#a855f7}.red{background:#ef4444}
.risk-green{color:#4ade80}.risk-yellow{color:#facc15}.risk-red{color:#f87171}
table{width:100%;border-collapse:collapse;margin-top:1rem;font-size:.85rem}
th,td{text-align:left;padding:.4rem;border-bottom:1px solid #374151}
.status{padding:4rem;text-align:center}
"#;

pub fn render_page(page: &DashboardPage) -> String {
    let selector = page
        .metros
        .iter()
        .map(|m| {
            format!(
                r#"<form method="post" action="/metros/{id}/select"><button type="submit"{class}>{display}</button></form>"#,
                id = escape(&m.id),
                class = if m.selected { r#" class="selected""# } else { "" },
                display = escape(&m.display),
            )
        })
        .collect::<String>();

    let body = match &page.view {
        DashboardView::Loading { metro } => format!(
            r#"<div class="status"><p>Loading {} data...</p><p class="muted">This page refreshes until the data arrives.</p></div>"#,
            escape(metro)
        ),
        DashboardView::Error { message, retry_href } => format!(
            r#"<div class="status"><p>{}</p><form method="post" action="{}"><button type="submit">Retry</button></form></div>"#,
            escape(message),
            escape(retry_href)
        ),
        DashboardView::Ready(view) => ready_body(view),
    };

    // Loading resolves in the background, so poll until it settles
    let refresh = match page.view {
        DashboardView::Loading { .. } => r#"<meta http-equiv="refresh" content="2">"#,
        _ => "",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8">{refresh}<title>Development Pipeline Dashboard</title><style>{STYLE}</style></head>
<body><header><h1>Development Pipeline</h1><nav class="metros">{selector}</nav></header>
<main>{body}</main></body></html>"#
    )
}

fn ready_body(view: &ReadyView) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<div style="display:flex;justify-content:space-between;align-items:baseline"><h2>{}</h2><span class="muted">{} projects &middot; last updated {} &middot; <a href="/export.pdf">Export PDF</a></span></div>"#,
        escape(&view.metro),
        format_units(view.total_projects),
        escape(&view.last_updated)
    );

    html.push_str(r#"<section class="cards">"#);
    for card in &view.summary {
        let _ = write!(
            html,
            r#"<div class="card"><div class="muted">{}</div><div class="value">{}</div><div class="muted">{}</div></div>"#,
            escape(card.title),
            escape(&card.value),
            escape(&card.detail)
        );
    }
    html.push_str("</section>");

    html.push_str(r#"<section class="panels"><div class="card"><h3>Pipeline by Stage</h3>"#);
    for stage in &view.stages {
        push_bar(&mut html, stage.label, stage.units, stage.percent, stage.colour);
    }
    html.push_str(r#"</div><div class="card"><h3>Top Submarkets</h3>"#);
    for submarket in &view.top_submarkets {
        push_bar(&mut html, &submarket.name, submarket.units, submarket.percent, "blue");
    }
    html.push_str("</div>");

    html.push_str(r#"<div class="card"><h3>Submarket Risk Analysis</h3><table><tr><th>Submarket</th><th>Units</th><th>Share</th><th>Risk</th></tr>"#);
    for risk in &view.risks {
        let _ = write!(
            html,
            r#"<tr><td>{}</td><td>{}</td><td>{}%</td><td class="risk-{}">{}</td></tr>"#,
            escape(&risk.submarket),
            format_units(risk.units),
            risk.percent,
            risk.colour,
            risk.risk
        );
    }
    html.push_str("</table></div>");

    html.push_str(r#"<div class="card"><h3>Developer Concentration</h3><table><tr><th>Developer</th><th>Units</th><th>Share</th></tr>"#);
    for developer in &view.developers {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{:.1}%</td></tr>",
            escape(&developer.name),
            format_units(developer.units),
            developer.percent
        );
    }
    html.push_str("</table></div></section>");

    html.push_str(r#"<section class="card" style="margin-top:1rem"><h3>Projects</h3><table><tr><th>Project Name</th><th>Address</th><th>Submarket</th><th>Units</th><th>Stage</th><th>Est. Delivery</th><th>Developer</th></tr>"#);
    for project in &view.projects {
        let _ = write!(
            html,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><span class="{}" style="padding:0 .4rem;border-radius:.25rem">{}</span></td><td>{}</td><td>{}</td></tr>"#,
            escape(&project.project_name),
            escape(&project.address),
            escape(&project.submarket),
            format_units(project.units),
            project.stage.colour(),
            project.stage.label(),
            escape(&project.estimated_delivery),
            escape(&project.developer)
        );
    }
    html.push_str("</table></section>");

    html
}

fn push_bar(html: &mut String, label: &str, units: u64, percent: u32, colour: &str) {
    let _ = write!(
        html,
        r#"<div><span>{}</span> <span class="muted">{} units &middot; {}%</span></div><div class="bar"><span class="{}" style="width:{}%"></span></div>"#,
        escape(label),
        format_units(units),
        percent,
        colour,
        percent.min(100)
    );
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::view::{MetroOption, RiskRow, StageBar, SummaryCard};

    fn options() -> Vec<MetroOption> {
        vec![
            MetroOption {
                id: "santa-clara".to_string(),
                display: "Santa Clara County".to_string(),
                selected: false,
            },
            MetroOption {
                id: "austin".to_string(),
                display: "Austin Metro".to_string(),
                selected: true,
            },
        ]
    }

    #[test]
    fn test_loading_page_has_no_dashboard_content() {
        let page = DashboardPage {
            metros: options(),
            view: DashboardView::Loading {
                metro: "Austin Metro".to_string(),
            },
        };

        let html = render_page(&page);

        assert!(html.contains("Loading Austin Metro data..."));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="2">"#));
        assert!(html.contains(
            r#"<form method="post" action="/metros/austin/select"><button type="submit" class="selected">Austin Metro</button></form>"#
        ));
        assert!(html.contains(r#"action="/metros/santa-clara/select"><button type="submit">"#));
        assert!(!html.contains("Export PDF"));
        assert!(!html.contains("Pipeline by Stage"));
    }

    #[test]
    fn test_error_page_links_retry() {
        let page = DashboardPage {
            metros: options(),
            view: DashboardView::Error {
                message: "Failed to load data for Austin Metro. Please try again.".to_string(),
                retry_href: "/retry".to_string(),
            },
        };

        let html = render_page(&page);

        assert!(html.contains("Failed to load data for Austin Metro. Please try again."));
        assert!(html.contains(
            r#"<form method="post" action="/retry"><button type="submit">Retry</button></form>"#
        ));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_ready_page_renders_panels_and_escapes() {
        let view = ReadyView {
            metro: "Austin Metro".to_string(),
            last_updated: "2025-03-01".to_string(),
            total_projects: 2,
            summary: vec![SummaryCard {
                title: "Total Pipeline Units",
                value: "1,000".to_string(),
                detail: "2 projects".to_string(),
            }],
            stages: vec![StageBar {
                label: "Planning",
                colour: "yellow",
                units: 150,
                percent: 15,
            }],
            top_submarkets: Vec::new(),
            risks: vec![RiskRow {
                submarket: "East <Riverside>".to_string(),
                units: 450,
                percent: 45,
                risk: "High",
                colour: "red",
            }],
            developers: Vec::new(),
            projects: Vec::new(),
        };
        let page = DashboardPage {
            metros: options(),
            view: DashboardView::Ready(Box::new(view)),
        };

        let html = render_page(&page);

        assert!(html.contains("Pipeline by Stage"));
        assert!(html.contains(r#"<span class="yellow" style="width:15%">"#));
        assert!(html.contains("East &lt;Riverside&gt;"));
        assert!(html.contains(r#"<td class="risk-red">High</td>"#));
        assert!(html.contains(r#"<a href="/export.pdf">Export PDF</a>"#));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }
}
