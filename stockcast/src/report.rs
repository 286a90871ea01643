//! Rendering a dashboard run
//!
//! The HTML report is a single file. Charts are Plotly figures serialized as
//! JSON and drawn by plotly.js from its CDN. The terminal view prints the
//! stationarity answer, the model summary and the predictions table.

use crate::error::Result;
use crate::pipeline::DashboardReport;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use stock_forecast::decomposition::Decomposition;
use stock_forecast::forecast::Forecast;
use stock_forecast::stationarity::SIGNIFICANCE_LEVEL;
use stock_forecast::{ColumnSeries, PriceColumn, PriceHistory};
use tabled::{Table, Tabled};
use tracing::info;

pub const APP_TITLE: &str = "Stock Market Forecasting App";
pub const APP_SUBTITLE: &str =
    "This app is created to forecast the stock market price of the selected company";
pub const HEADER_IMAGE: &str = "https://media.istockphoto.com/id/1487894858/photo/candlestick-chart-and-data-of-financial-market.webp?b=1&s=170667a&w=0&k=20&c=iwQM0ozj7upM-_7CUEjZ2veIY3ljlB8m3PbijouIyVM=";
pub const AUTHOR: &str = "Syed Ali Faizan";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// An image link in the author block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialLink {
    pub name: &'static str,
    pub image_url: &'static str,
    pub redirect_url: &'static str,
}

pub const SOCIAL_LINKS: [SocialLink; 3] = [
    SocialLink {
        name: "LinkedIn",
        image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTVU5JBJYMzdr32kvZCr6eoRT5xy3E91kbUaTvAEr0&s",
        redirect_url: "www.linkedin.com/in/syed-ali-faizan-5131bb194",
    },
    SocialLink {
        name: "GitHub",
        image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSVdtrueQqt-wsYtp-UI1DutqtUbtrEeeKDtXAJE0U&s",
        redirect_url: "https://github.com/AliTheAnalyst01",
    },
    SocialLink {
        name: "Kaggle",
        image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQQnB1IbBU743XF3Aipf0kZhcTixQV3IARu27rZTPaEfg&s",
        redirect_url: "https://www.kaggle.com/faizanzaidy",
    },
];

fn date_labels(dates: &[NaiveDate]) -> Vec<String> {
    dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect()
}

fn line(x: &[String], y: &[f64], name: &str) -> Value {
    json!({ "type": "scatter", "mode": "lines", "name": name, "x": x, "y": y })
}

/// Every column of the raw history over time
pub fn history_figure(history: &PriceHistory) -> Result<Value> {
    let x = date_labels(&history.dates()?);
    let traces = PriceColumn::ALL
        .iter()
        .map(|c| -> Result<Value> { Ok(line(&x, &history.column_values(*c)?, c.name())) })
        .collect::<Result<Vec<_>>>()?;

    Ok(json!({
        "data": traces,
        "layout": {
            "title": "Closing Price of Stock",
            "width": 800,
            "height": 600,
            "xaxis": { "title": "Date" },
        },
    }))
}

/// Observed, trend, seasonal and residual panels stacked vertically
pub fn decomposition_figure(decomposition: &Decomposition, dates: &[NaiveDate]) -> Value {
    let x = date_labels(dates);
    let panels = [
        ("Observed", &decomposition.observed),
        ("Trend", &decomposition.trend),
        ("Seasonal", &decomposition.seasonal),
        ("Resid", &decomposition.residual),
    ];

    let mut traces = Vec::with_capacity(panels.len());
    let mut layout = json!({
        "title": "Seasonal decomposition",
        "width": 800,
        "height": 800,
        "showlegend": false,
        "grid": { "rows": panels.len(), "columns": 1, "pattern": "independent" },
    });
    for (i, (name, values)) in panels.iter().enumerate() {
        let suffix = if i == 0 { String::new() } else { (i + 1).to_string() };
        let mut trace = line(&x, values, name);
        trace["xaxis"] = json!(format!("x{}", suffix));
        trace["yaxis"] = json!(format!("y{}", suffix));
        if *name == "Resid" {
            trace["mode"] = json!("markers");
        }
        traces.push(trace);
        layout[format!("yaxis{}", suffix)] = json!({ "title": name });
    }

    json!({ "data": traces, "layout": layout })
}

/// Actual prices in blue and predictions in red
pub fn forecast_figure(actual: &ColumnSeries, forecast: &Forecast) -> Value {
    let mut actual_trace = line(&date_labels(&actual.dates), &actual.values, "Actual");
    actual_trace["line"] = json!({ "color": "blue" });
    let mut predicted_trace = line(
        &date_labels(&forecast.dates()),
        &forecast.predicted_mean(),
        "Predicted",
    );
    predicted_trace["line"] = json!({ "color": "red" });

    json!({
        "data": [actual_trace, predicted_trace],
        "layout": {
            "title": "Actual vs Predicted",
            "xaxis": { "title": "Date" },
            "yaxis": { "title": "Price" },
            "width": 800,
            "height": 400,
        },
    })
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn html_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut html = String::from("<table>\n<thead><tr>");
    for h in headers {
        html.push_str(&format!("<th>{}</th>", escape_html(h)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn history_rows(history: &PriceHistory) -> Result<Vec<Vec<String>>> {
    let rows = history
        .bars()?
        .into_iter()
        .map(|bar| {
            let mut row = vec![bar.date.to_string()];
            row.extend(PriceColumn::ALL.iter().map(|c| match c {
                PriceColumn::Volume => bar.data.volume.to_string(),
                _ => format!("{:.4}", bar.value(*c)),
            }));
            row
        })
        .collect();
    Ok(rows)
}

fn figure_div(id: &str, figure: &Value) -> Result<String> {
    // "</" inside a script element would end it early
    let json = serde_json::to_string(figure)?.replace("</", "<\\/");
    Ok(format!(
        "<div id=\"{id}\"></div>\n<script>\n(function() {{ var fig = {json}; Plotly.newPlot(\"{id}\", fig.data, fig.layout); }})();\n</script>\n",
        id = id,
        json = json
    ))
}

fn author_block() -> String {
    let mut html = String::from("<h3>About the Author</h3>\n");
    html.push_str(&format!(
        "<p class=\"author\">{}</p>\n<h2>Connect with me on social media</h2>\n<p>",
        escape_html(AUTHOR)
    ));
    for link in SOCIAL_LINKS {
        html.push_str(&format!(
            "<a href=\"{}\"><img src=\"{}\" alt=\"{}\" width=\"60\" height=\"60\"></a>",
            escape_html(link.redirect_url),
            escape_html(link.image_url),
            escape_html(link.name)
        ));
    }
    html.push_str("</p>\n");
    html
}

const STYLE: &str = "body { font-family: sans-serif; max-width: 960px; margin: 0 auto; padding: 1em; }
table { border-collapse: collapse; font-size: 0.85em; }
th, td { border: 1px solid #ccc; padding: 2px 6px; text-align: right; }
.scroll { max-height: 320px; overflow-y: auto; margin-bottom: 1em; }
.forecast-title { color: green; font-size: 50px; font-weight: bold; }
.author { color: blue; font-weight: bold; font-size: 50px; }
pre { background: #f6f6f6; padding: 1em; overflow-x: auto; }";

/// The full HTML page for a run
pub fn render_html(report: &DashboardReport) -> Result<String> {
    let params = &report.params;
    let column = params.column.name();

    let mut headers = vec!["Date"];
    headers.extend(PriceColumn::ALL.iter().map(|c| c.name()));
    let selected_rows: Vec<Vec<String>> = report
        .selected
        .dates
        .iter()
        .zip(&report.selected.values)
        .map(|(d, v)| vec![d.to_string(), format!("{:.4}", v)])
        .collect();
    let prediction_rows: Vec<Vec<String>> = report
        .forecast
        .rows()
        .iter()
        .map(|r| {
            vec![
                r.date.to_string(),
                format!("{:.4}", r.predicted_mean),
                format!("{:.4}", r.lower),
                format!("{:.4}", r.upper),
            ]
        })
        .collect();

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(APP_TITLE)));
    html.push_str(&format!("<script src=\"{}\"></script>\n", PLOTLY_CDN));
    html.push_str(&format!("<style>\n{}\n</style>\n</head>\n<body>\n", STYLE));

    html.push_str(&format!(
        "<h1>{}</h1>\n<h3>{}</h3>\n<img src=\"{}\" alt=\"Candlestick chart\" width=\"100%\">\n",
        escape_html(APP_TITLE),
        escape_html(APP_SUBTITLE),
        escape_html(HEADER_IMAGE)
    ));
    html.push_str(&format!(
        "<p>Ticker <b>{}</b>, data from {} to {}</p>\n",
        escape_html(&params.ticker),
        params.start_date,
        params.end_date
    ));
    html.push_str("<div class=\"scroll\">\n");
    html.push_str(&html_table(&headers, &history_rows(&report.history)?));
    html.push_str("</div>\n");

    html.push_str("<h2>Data Visualization</h2>\n<h3>Plot of the data</h3>\n");
    html.push_str(&figure_div("history", &history_figure(&report.history)?)?);

    html.push_str(&format!(
        "<h3>Selected Data</h3>\n<div class=\"scroll\">\n{}</div>\n",
        html_table(&["Date", column], &selected_rows)
    ));

    html.push_str("<h2>Is data stationary?</h2>\n");
    html.push_str(&format!(
        "<p><b>Note</b> If p-value is less than {} then data is stationary</p>\n",
        SIGNIFICANCE_LEVEL
    ));
    html.push_str(&format!(
        "<p><b>{}</b> (ADF statistic {:.4}, p-value {:.4}, {} lags)</p>\n",
        report.is_stationary(),
        report.adf.statistic,
        report.adf.p_value,
        report.adf.used_lag
    ));

    html.push_str("<h2>Decomposition of the data column</h2>\n");
    html.push_str(&figure_div(
        "decomposition",
        &decomposition_figure(&report.decomposition, &report.selected.dates),
    )?);

    html.push_str("<h2>Model Summary</h2>\n");
    html.push_str(&format!("<pre>{}</pre>\n<hr>\n", escape_html(&report.summary.to_string())));

    html.push_str("<p class=\"forecast-title\">Forecasting the data</p>\n");
    html.push_str(&format!(
        "<h2>Predictions</h2>\n{}",
        html_table(&["Date", "predicted_mean", "lower", "upper"], &prediction_rows)
    ));
    html.push_str(&format!(
        "<h2>Actual Data</h2>\n<div class=\"scroll\">\n{}</div>\n<hr>\n",
        html_table(&["Date", column], &selected_rows)
    ));
    html.push_str(&figure_div(
        "forecast",
        &forecast_figure(&report.selected, &report.forecast),
    )?);
    html.push_str("<hr>\n");

    html.push_str(&author_block());
    html.push_str("</body>\n</html>\n");
    Ok(html)
}

/// Render and write the HTML page
pub fn write_html(report: &DashboardReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render_html(report)?)?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "predicted_mean")]
    predicted_mean: String,
    #[tabled(rename = "lower")]
    lower: String,
    #[tabled(rename = "upper")]
    upper: String,
}

/// Predictions as a text table
pub fn predictions_table(forecast: &Forecast) -> String {
    let rows = forecast.rows().iter().map(|r| PredictionRow {
        date: r.date.to_string(),
        predicted_mean: format!("{:.4}", r.predicted_mean),
        lower: format!("{:.4}", r.lower),
        upper: format!("{:.4}", r.upper),
    });
    Table::new(rows).to_string()
}

/// What the terminal shows after a run
pub fn terminal_summary(report: &DashboardReport) -> String {
    format!(
        "Is data stationary? {} (p-value {:.4})\n\n{}\nPredictions\n{}\n",
        report.is_stationary(),
        report.adf.p_value,
        report.summary,
        predictions_table(&report.forecast)
    )
}
