//! Chart building blocks for the dashboard.
//!
//! The engagement trend is drawn with Plotters through
//! `plotters-ratatui-backend`. The two mix panels (sentiment, media type)
//! are text percentage bars: at terminal resolution those read better than a
//! real pie chart, while showing the same proportions.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::domain::{DatePoint, SeriesPoint};

/// Colors cycled through for categorical percentage bars.
const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Red,
];

const LABEL_WIDTH: usize = 12;

pub fn palette_color(idx: usize, _label: &str) -> Color {
    PALETTE[idx % PALETTE.len()]
}

/// Sentiment labels get semantic colors; anything else cycles the palette.
pub fn sentiment_color(idx: usize, label: &str) -> Color {
    match label {
        "Positive" => Color::Green,
        "Negative" => Color::Red,
        "Neutral" => Color::Yellow,
        _ => palette_color(idx, label),
    }
}

/// Build percentage-bar lines for a counted series.
///
/// One line per label: `label ████░░░░ 42.0% (123)`.
pub fn percent_lines(
    series: &[SeriesPoint],
    width: u16,
    color_for: fn(usize, &str) -> Color,
) -> Vec<Line<'static>> {
    let total: u64 = series.iter().map(|p| p.value).sum();
    if total == 0 {
        return vec![Line::from("(no data)")];
    }

    let bar_width = usize::from(width)
        .saturating_sub(LABEL_WIDTH + 16)
        .clamp(4, 30);

    series
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let share = point.value as f64 / total as f64;
            let filled = ((share * bar_width as f64).round() as usize).min(bar_width);

            Line::from(vec![
                Span::raw(format!("{:<width$} ", fit_label(&point.label), width = LABEL_WIDTH)),
                Span::styled(
                    "█".repeat(filled),
                    Style::default().fg(color_for(idx, &point.label)),
                ),
                Span::styled("░".repeat(bar_width - filled), Style::default().fg(Color::DarkGray)),
                Span::raw(format!(" {:>5.1}% ({})", share * 100.0, point.value)),
            ])
        })
        .collect()
}

fn fit_label(label: &str) -> String {
    if label.chars().count() <= LABEL_WIDTH {
        return label.to_string();
    }
    let mut out: String = label.chars().take(LABEL_WIDTH - 1).collect();
    out.push('…');
    out
}

/// Daily engagement line chart.
///
/// The widget is data-driven and render-only: series and bounds are computed
/// up front in `new`, so `render()` stays focused on drawing.
pub struct TrendChart {
    points: Vec<(f64, f64)>,
    base: NaiveDate,
    x_max: f64,
    y_max: f64,
}

impl TrendChart {
    pub fn new(days: &[DatePoint]) -> Self {
        let base = days.first().map(|d| d.date).unwrap_or(NaiveDate::MIN);
        let points: Vec<(f64, f64)> = days
            .iter()
            .map(|d| ((d.date - base).num_days() as f64, d.value as f64))
            .collect();

        let x_max = points.last().map(|p| p.0).unwrap_or(0.0).max(1.0);
        let y_max = points.iter().fold(0.0_f64, |m, p| m.max(p.1)).max(1.0);

        Self {
            points,
            base,
            x_max,
            y_max,
        }
    }
}

impl Widget for TrendChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. Render a small hint rather than panicking.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }
        if self.points.is_empty() {
            return;
        }

        let base = self.base;
        let points = self.points;
        let x_max = self.x_max;
        let y_max = self.y_max;

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(0.0..x_max * 1.02, 0.0..y_max * 1.05)?;

            // Mesh lines are visual clutter at this resolution; axes + tick
            // labels are enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc("engagements")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (base + Duration::days(*v as i64)).format("%m-%d").to_string())
                .y_label_formatter(&|v| format_count(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan

            chart.draw_series(LineSeries::new(points.iter().copied(), &line_color))?;
            // Markers on top of the line, like the original trend chart.
            chart.draw_series(points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn format_count(v: f64) -> String {
    if v >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v >= 10_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesPoint;

    #[test]
    fn percent_lines_reflect_shares() {
        let series = vec![
            SeriesPoint {
                label: "Positive".to_string(),
                value: 3,
            },
            SeriesPoint {
                label: "Negative".to_string(),
                value: 1,
            },
        ];

        let lines = percent_lines(&series, 60, sentiment_color);
        assert_eq!(lines.len(), 2);

        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(first.starts_with("Positive"));
        assert!(first.contains("75.0%"));
        assert!(first.contains("(3)"));
    }

    #[test]
    fn empty_series_reports_no_data() {
        let lines = percent_lines(&[], 60, palette_color);
        let text: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "(no data)");
    }

    #[test]
    fn long_labels_are_fitted() {
        assert_eq!(fit_label("Short"), "Short");
        let fitted = fit_label("A very long location name");
        assert_eq!(fitted.chars().count(), LABEL_WIDTH);
        assert!(fitted.ends_with('…'));
    }

    #[test]
    fn count_formatting_scales() {
        assert_eq!(format_count(42.0), "42");
        assert_eq!(format_count(25_000.0), "25k");
        assert_eq!(format_count(1_500_000.0), "1.5M");
    }
}
