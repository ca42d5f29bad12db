use crate::github::Truncation;
use crate::stats::{DashboardStats, LanguageCount, YearCount};
use crate::table::RepositoryRow;
use clap::ValueEnum;
use url::Url;

const GITHUB_WEB_URL: &str = "https://github.com/";

const CHART_WIDTH: f32 = 640.0;
const CHART_HEIGHT: f32 = 320.0;
const MARGIN_TOP: f32 = 40.0;
const MARGIN_BOTTOM: f32 = 56.0;
const MARGIN_LEFT: f32 = 48.0;
const MARGIN_RIGHT: f32 = 24.0;
const LABEL_COLUMN: f32 = 180.0;
const CHAR_WIDTH: f32 = 7.2;

const PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub panel: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub grid: &'static str,
    pub accent: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "#0d1117",
                panel: "#161b22",
                text: "#c9d1d9",
                muted: "#8b949e",
                grid: "#30363d",
                accent: "#58a6ff",
            },
            Theme::Light => ThemeColors {
                bg: "#f6f8fa",
                panel: "#ffffff",
                text: "#24292f",
                muted: "#57606a",
                grid: "#d0d7de",
                accent: "#0969da",
            },
        }
    }
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Shorten to `max` characters, marking the cut with an ellipsis.
fn clip(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let head: String = label.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn svg_open(title: &str, colors: &ThemeColors) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" role="img" font-family="-apple-system,Segoe UI,Helvetica,Arial,sans-serif" font-size="12px">
<title>{title}</title>
<rect width="{w}" height="{h}" fill="{panel}" rx="8"/>
<text x="{MARGIN_LEFT}" y="24" fill="{text}" font-size="15px" font-weight="600">{title}</text>
"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        title = escape_xml(title),
        panel = colors.panel,
        text = colors.text,
    )
}

fn empty_chart(title: &str, colors: &ThemeColors) -> String {
    let mut out = svg_open(title, colors);
    out.push_str(&format!(
        r#"<text x="{x}" y="{y}" fill="{muted}" text-anchor="middle">No data</text>
</svg>
"#,
        x = CHART_WIDTH / 2.0,
        y = CHART_HEIGHT / 2.0,
        muted = colors.muted,
    ));
    out
}

/// Vertical bars, one per language.
pub fn language_chart(languages: &[LanguageCount], theme: Theme) -> String {
    let colors = theme.colors();
    let title = "Most used languages";
    if languages.is_empty() {
        return empty_chart(title, &colors);
    }

    let plot_w = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;
    let max = languages.iter().map(|l| l.repositories).max().unwrap_or(1).max(1) as f32;
    let slot = plot_w / languages.len() as f32;
    let bar_w = (slot * 0.7).max(1.0);
    let label_chars = ((slot / CHAR_WIDTH) as usize).max(3);

    let mut out = svg_open(title, &colors);
    out.push_str(&format!(
        r#"<line x1="{MARGIN_LEFT}" y1="{baseline}" x2="{x2}" y2="{baseline}" stroke="{grid}"/>
"#,
        x2 = CHART_WIDTH - MARGIN_RIGHT,
        grid = colors.grid,
    ));

    for (i, entry) in languages.iter().enumerate() {
        let h = entry.repositories as f32 / max * plot_h;
        let x = MARGIN_LEFT + i as f32 * slot + (slot - bar_w) / 2.0;
        let y = baseline - h;
        let cx = x + bar_w / 2.0;
        out.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{fill}"><title>{name}: {count}</title></rect>
<text x="{cx:.1}" y="{vy:.1}" fill="{text}" text-anchor="middle">{count}</text>
<text x="{cx:.1}" y="{ly:.1}" fill="{muted}" text-anchor="middle">{label}</text>
"#,
            fill = color(i),
            name = escape_xml(&entry.language),
            count = entry.repositories,
            vy = y - 4.0,
            ly = baseline + 16.0,
            text = colors.text,
            muted = colors.muted,
            label = escape_xml(&clip(&entry.language, label_chars)),
        ));
    }

    out.push_str("</svg>\n");
    out
}

/// Horizontal bars, most starred on top.
pub fn top_repositories_chart(rows: &[RepositoryRow], theme: Theme) -> String {
    let colors = theme.colors();
    let title = format!("Top {} repositories (by stars)", rows.len());
    if rows.is_empty() {
        return empty_chart("Top repositories (by stars)", &colors);
    }

    let left = MARGIN_LEFT + LABEL_COLUMN;
    let plot_w = CHART_WIDTH - left - MARGIN_RIGHT - 40.0;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - 16.0;
    let max = rows.iter().map(|r| r.stargazers_count).max().unwrap_or(1).max(1) as f32;
    let slot = plot_h / rows.len() as f32;
    let bar_h = (slot * 0.7).max(1.0);
    let label_chars = (LABEL_COLUMN / CHAR_WIDTH) as usize;

    let mut out = svg_open(&title, &colors);
    for (i, row) in rows.iter().enumerate() {
        let w = (row.stargazers_count as f32 / max * plot_w).max(1.0);
        let y = MARGIN_TOP + i as f32 * slot + (slot - bar_h) / 2.0;
        let ty = y + bar_h / 2.0 + 4.0;
        out.push_str(&format!(
            r#"<text x="{lx:.1}" y="{ty:.1}" fill="{muted}" text-anchor="end">{label}</text>
<rect x="{left:.1}" y="{y:.1}" width="{w:.1}" height="{bar_h:.1}" fill="{fill}"><title>{name}: {stars}</title></rect>
<text x="{vx:.1}" y="{ty:.1}" fill="{text}">{stars}</text>
"#,
            lx = left - 8.0,
            muted = colors.muted,
            label = escape_xml(&clip(&row.name, label_chars)),
            fill = colors.accent,
            name = escape_xml(&row.name),
            stars = row.stargazers_count,
            vx = left + w + 6.0,
            text = colors.text,
        ));
    }

    out.push_str("</svg>\n");
    out
}

/// Line through the per-year creation counts.
pub fn yearly_chart(years: &[YearCount], theme: Theme) -> String {
    let colors = theme.colors();
    let title = "Repositories created per year";
    if years.is_empty() {
        return empty_chart(title, &colors);
    }

    let plot_w = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;
    let max = years.iter().map(|y| y.repositories).max().unwrap_or(1).max(1) as f32;
    let step = if years.len() > 1 {
        plot_w / (years.len() - 1) as f32
    } else {
        0.0
    };

    let points: Vec<(f32, f32)> = years
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let x = if years.len() > 1 {
                MARGIN_LEFT + i as f32 * step
            } else {
                MARGIN_LEFT + plot_w / 2.0
            };
            (x, baseline - entry.repositories as f32 / max * plot_h)
        })
        .collect();

    let mut out = svg_open(title, &colors);
    out.push_str(&format!(
        r#"<line x1="{MARGIN_LEFT}" y1="{baseline}" x2="{x2}" y2="{baseline}" stroke="{grid}"/>
"#,
        x2 = CHART_WIDTH - MARGIN_RIGHT,
        grid = colors.grid,
    ));

    let polyline: Vec<String> = points.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
    out.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>
"#,
        polyline.join(" "),
        colors.accent,
    ));

    for (entry, (x, y)) in years.iter().zip(&points) {
        out.push_str(&format!(
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{accent}"><title>{year}: {count}</title></circle>
<text x="{x:.1}" y="{vy:.1}" fill="{text}" text-anchor="middle">{count}</text>
<text x="{x:.1}" y="{ly:.1}" fill="{muted}" text-anchor="middle">{year}</text>
"#,
            accent = colors.accent,
            year = entry.year,
            count = entry.repositories,
            vy = y - 8.0,
            ly = baseline + 16.0,
            text = colors.text,
            muted = colors.muted,
        ));
    }

    out.push_str("</svg>\n");
    out
}

fn page(title: &str, body: &str, theme: Theme) -> String {
    let colors = theme.colors();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body    {{ background: {bg}; color: {text}; font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; padding: 24px 40px; }}
a       {{ color: {accent}; }}
.muted  {{ color: {muted}; }}
.cards  {{ display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; margin: 24px 0; }}
.card   {{ background: {panel}; border: 1px solid {grid}; border-radius: 8px; padding: 16px; }}
.card .label {{ color: {muted}; font-size: 14px; }}
.card .value {{ font-size: 32px; font-weight: 600; }}
.chart  {{ margin: 24px 0; }}
.notice {{ border: 1px solid #d29922; border-radius: 8px; padding: 12px 16px; color: #d29922; }}
.error  {{ border: 1px solid #f85149; border-radius: 8px; padding: 12px 16px; color: #f85149; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_xml(title),
        bg = colors.bg,
        text = colors.text,
        accent = colors.accent,
        muted = colors.muted,
        panel = colors.panel,
        grid = colors.grid,
    )
}

/// `https://github.com/{account}` with the account as one encoded path segment.
pub fn profile_url(account: &str) -> String {
    match Url::parse(GITHUB_WEB_URL) {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(account);
            }
            url.to_string()
        }
        Err(_) => format!("{GITHUB_WEB_URL}{account}"),
    }
}

fn header(account: &str) -> String {
    format!(
        r#"<h1>GitHub Dashboard</h1>
<p class="muted">Public statistics for <a href="{href}"><strong>{name}</strong></a></p>
"#,
        href = escape_xml(&profile_url(account)),
        name = escape_xml(account),
    )
}

fn metric_card(label: &str, value: &str) -> String {
    format!(
        r#"<div class="card"><div class="label">{}</div><div class="value">{}</div></div>"#,
        escape_xml(label),
        escape_xml(value)
    )
}

/// Full dashboard document: metric cards followed by the three charts.
pub fn render_dashboard(
    account: &str,
    stats: &DashboardStats,
    truncation: Option<&Truncation>,
    theme: Theme,
) -> String {
    let mut body = header(account);

    if let Some(cause) = truncation {
        body.push_str(&format!(
            "<p class=\"notice\">Showing a partial listing: {}.</p>\n",
            escape_xml(&cause.to_string())
        ));
    }

    body.push_str("<div class=\"cards\">\n");
    body.push_str(&metric_card(
        "Public repositories",
        &stats.summary.repository_count.to_string(),
    ));
    body.push_str(&metric_card("Total stars", &stats.summary.total_stars.to_string()));
    body.push_str(&metric_card(
        "Languages used",
        &stats.summary.distinct_languages.to_string(),
    ));
    body.push_str("\n</div>\n");

    for chart in [
        language_chart(&stats.languages, theme),
        top_repositories_chart(&stats.top_repositories, theme),
        yearly_chart(&stats.years, theme),
    ] {
        body.push_str("<div class=\"chart\">\n");
        body.push_str(&chart);
        body.push_str("</div>\n");
    }

    page(&format!("GitHub Dashboard - {account}"), &body, theme)
}

/// Page shown when no repository could be retrieved.
pub fn render_empty(account: &str, theme: Theme) -> String {
    let mut body = header(account);
    body.push_str(
        "<p class=\"error\">Could not fetch any repositories. Check the username.</p>\n",
    );
    page("GitHub Dashboard", &body, theme)
}
