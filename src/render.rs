use crate::simulation::{BOT_KD_MAX, BOT_KD_MIN};
use crate::types::*;
use serde::Serialize;

pub const Y_AXIS_LABEL: &str = "Players in Bracket (per Lobby)";

/// One bar of the per-bracket chart
#[derive(Clone, Debug, Serialize)]
pub struct Bar {
    pub label: &'static str,
    pub count: u32,
    pub color: &'static str,
}

/// Chart data for front ends; drawing is left to the caller
#[derive(Clone, Debug, Serialize)]
pub struct BarChart {
    pub title: String,
    pub y_label: &'static str,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn from_report(report: &LobbyReport) -> Self {
        let comp = &report.composition;
        let bars = BRACKETS
            .iter()
            .zip(comp.per_bracket_human_counts.iter())
            .map(|(bracket, &count)| Bar {
                label: bracket.label,
                count,
                color: bracket.color,
            })
            .collect();

        Self {
            title: format!(
                "Bots: {}, Humans: {} ({})",
                comp.bot_count, comp.human_count, report.churn_description
            ),
            y_label: Y_AXIS_LABEL,
            bars,
        }
    }
}

/// Horizontal text rendering of a chart, bars scaled to `width` columns
pub fn render_bar_chart(chart: &BarChart, width: usize) -> String {
    let max_count = chart.bars.iter().map(|b| b.count).max().unwrap_or(0);
    let label_width = chart
        .bars
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(chart.bars.len() + 2);
    lines.push(chart.title.clone());
    lines.push(format!("{:>w$} | {}", "", chart.y_label, w = label_width));

    for bar in &chart.bars {
        let len = if max_count == 0 {
            0
        } else {
            // Any non-empty bracket gets at least one cell, never more than `width`
            let scaled = (bar.count as f64 / max_count as f64 * width as f64).round() as usize;
            if bar.count > 0 {
                scaled.max(1).min(width)
            } else {
                0
            }
        };
        lines.push(format!(
            "{:>w$} | {} {}",
            bar.label,
            "█".repeat(len),
            bar.count,
            w = label_width
        ));
    }

    lines.join("\n")
}

/// Text breakdown printed under the chart
pub fn render_summary(report: &LobbyReport) -> String {
    let comp = &report.composition;
    let score = &report.score;
    let pct = comp.percentages();

    let mut lines = Vec::new();
    for (i, bracket) in BRACKETS.iter().enumerate() {
        lines.push(format!(
            "{:<25}: {:5.2} exp, {:3} actual ({:4.1}%)",
            bracket.label, comp.expected_counts[i], comp.per_bracket_human_counts[i], pct[i]
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Top 1% humans per lobby : ~{:.2}",
        comp.expected_counts[NUM_BRACKETS - 2]
    ));
    lines.push(format!(
        "Top 0.1% humans per lobby: ~{:.2}",
        comp.expected_counts[NUM_BRACKETS - 1]
    ));
    lines.push(String::new());
    lines.push(format!(
        "SWEATYNESS (1-10): {:.1}   |   Sweat Rating: {}",
        score.value, score.rating
    ));
    lines.push(format!("Composite (weighted): {:.2}", score.composite));
    lines.push(format!("Median K/D (all): {:.2}", score.median_kd));
    lines.push(format!("Mean K/D (top 10): {:.2}", score.top10_mean_kd));
    if let Some(human_median) = report.human_median_kd {
        lines.push(format!("  (Median K/D, humans only): {:.2}", human_median));
    }
    lines.push(format!(
        "Bots: {} (K/D {}–{})",
        comp.bot_count, BOT_KD_MIN, BOT_KD_MAX
    ));
    lines.push(format!("Humans: {}", comp.human_count));

    lines.join("\n")
}
