use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::models::UserView;
use crate::services::stats_service::{domain_counts, domain_initials};

pub const CSV_FILE_NAME: &str = "usuarios_data.csv";
const CSV_HEADER: [&str; 8] = [
    "id",
    "name",
    "username",
    "email",
    "phone",
    "website",
    "name_length",
    "email_domain",
];

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const PRIMARY_COLOR: &str = "#667eea";

/// Derived view as CSV: header row, nulls as empty fields, UTF-8.
pub fn users_csv(rows: &[UserView]) -> Result<Vec<u8>> {
    // Header written by hand so an empty snapshot still exports one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Export(e.to_string()))
}

/// Charts that can be exported as standalone HTML documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Histogram,
    Domains,
    Donut,
    Scatter,
    Initials,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Histogram,
        ChartKind::Domains,
        ChartKind::Donut,
        ChartKind::Scatter,
        ChartKind::Initials,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "histogram",
            ChartKind::Domains => "domains",
            ChartKind::Donut => "donut",
            ChartKind::Scatter => "scatter",
            ChartKind::Initials => "initials",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "hist_name_length.html",
            ChartKind::Domains => "email_domains_bar.html",
            ChartKind::Donut => "email_domains_donut.html",
            ChartKind::Scatter => "id_vs_name_length.html",
            ChartKind::Initials => "domain_initials.html",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "Distribución de caracteres en los nombres",
            ChartKind::Domains => "Usuarios por dominio de correo electrónico",
            ChartKind::Donut => "Distribución de dominios de email",
            ChartKind::Scatter => "Relación entre ID y longitud del nombre",
            ChartKind::Initials => "Usuarios por dominio y letra inicial del nombre",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.strip_suffix(".html").unwrap_or(s);
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| AppError::BadRequest(format!("unknown chart kind: {s}")))
    }
}

/// Plotly figure (data + layout) for one chart.
pub fn chart_figure(kind: ChartKind, rows: &[UserView]) -> Value {
    let (data, mut layout) = match kind {
        ChartKind::Histogram => histogram(rows),
        ChartKind::Domains => domains_bar(rows),
        ChartKind::Donut => domains_donut(rows),
        ChartKind::Scatter => scatter(rows),
        ChartKind::Initials => initials_bar(rows),
    };

    layout["title"] = json!({ "text": kind.title(), "font": { "size": 20 } });
    layout["font"] = json!({ "size": 14 });
    layout["plot_bgcolor"] = json!("rgba(0,0,0,0)");
    layout["paper_bgcolor"] = json!("rgba(0,0,0,0)");

    json!({ "data": data, "layout": layout })
}

/// Standalone HTML document rendering one chart, plotly.js loaded from its CDN.
pub fn chart_html(kind: ChartKind, rows: &[UserView]) -> Result<String> {
    let figure = serde_json::to_string(&chart_figure(kind, rows))
        .map_err(|e| AppError::Export(e.to_string()))?
        // Keep the payload from closing the script element
        .replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:100%;"></div>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout, {{ responsive: true }});
</script>
</body>
</html>
"#,
        title = kind.title(),
        cdn = PLOTLY_CDN,
    ))
}

fn histogram(rows: &[UserView]) -> (Value, Value) {
    let lengths: Vec<i64> = rows.iter().map(|row| row.name_length).collect();
    (
        json!([{
            "type": "histogram",
            "x": lengths,
            "nbinsx": 10,
            "marker": { "color": PRIMARY_COLOR },
        }]),
        json!({
            "height": 400,
            "xaxis": { "title": { "text": "Cantidad de caracteres" } },
            "yaxis": { "title": { "text": "Frecuencia" } },
        }),
    )
}

fn domains_bar(rows: &[UserView]) -> (Value, Value) {
    let counts = domain_counts(rows);
    let domains: Vec<&str> = counts.iter().map(|c| c.email_domain.as_str()).collect();
    let values: Vec<usize> = counts.iter().map(|c| c.count).collect();
    (
        json!([{
            "type": "bar",
            "orientation": "h",
            "x": values,
            "y": domains,
            "marker": { "color": values, "colorscale": "Viridis" },
        }]),
        json!({
            "height": 500,
            "showlegend": false,
            "xaxis": { "title": { "text": "Cantidad de usuarios" } },
            "yaxis": { "title": { "text": "Dominio" } },
        }),
    )
}

fn domains_donut(rows: &[UserView]) -> (Value, Value) {
    let counts = domain_counts(rows);
    let domains: Vec<&str> = counts.iter().map(|c| c.email_domain.as_str()).collect();
    let values: Vec<usize> = counts.iter().map(|c| c.count).collect();
    (
        json!([{
            "type": "pie",
            "labels": domains,
            "values": values,
            "hole": 0.4,
        }]),
        json!({ "height": 500 }),
    )
}

fn scatter(rows: &[UserView]) -> (Value, Value) {
    let mut by_domain: BTreeMap<Option<&str>, Vec<&UserView>> = BTreeMap::new();
    for row in rows {
        by_domain
            .entry(row.email_domain.as_deref())
            .or_default()
            .push(row);
    }

    let traces: Vec<Value> = by_domain
        .into_iter()
        .map(|(domain, members)| {
            let ids: Vec<i64> = members.iter().map(|row| row.id).collect();
            let lengths: Vec<i64> = members.iter().map(|row| row.name_length).collect();
            let hover: Vec<String> = members
                .iter()
                .map(|row| {
                    format!(
                        "{}<br>{}",
                        row.display_name(),
                        row.email.as_deref().unwrap_or_default()
                    )
                })
                .collect();
            json!({
                "type": "scatter",
                "mode": "markers",
                "name": domain.unwrap_or("sin dominio"),
                "x": ids,
                "y": lengths,
                "text": hover,
                "marker": { "size": lengths },
            })
        })
        .collect();

    (
        Value::Array(traces),
        json!({
            "height": 500,
            "xaxis": { "title": { "text": "ID de Usuario" } },
            "yaxis": { "title": { "text": "Longitud del Nombre" } },
        }),
    )
}

fn initials_bar(rows: &[UserView]) -> (Value, Value) {
    let mut by_initial: BTreeMap<String, (Vec<String>, Vec<usize>)> = BTreeMap::new();
    for group in domain_initials(rows) {
        let (domains, counts) = by_initial.entry(group.initial).or_default();
        domains.push(group.email_domain);
        counts.push(group.count);
    }

    let traces: Vec<Value> = by_initial
        .into_iter()
        .map(|(initial, (domains, counts))| {
            json!({
                "type": "bar",
                "name": initial,
                "x": domains,
                "y": counts,
            })
        })
        .collect();

    (
        Value::Array(traces),
        json!({
            "height": 500,
            "barmode": "group",
            "legend": { "title": { "text": "Inicial del Nombre" } },
            "xaxis": { "title": { "text": "Dominio de correo" } },
            "yaxis": { "title": { "text": "Cantidad de usuarios" } },
        }),
    )
}
