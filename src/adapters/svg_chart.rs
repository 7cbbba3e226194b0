//! SVG chart rendering of the Dbs table.
//!
//! Three stacked panels share one x axis: reference close, DbsMa with
//! ±limit guides, and raw Dbs with ±3 guides. Rows where DbsMa is above
//! the limit are shaded red, rows below -limit green.

use crate::domain::dbs::DbsTable;
use crate::domain::error::MonitorError;
use crate::ports::chart_port::ChartPort;
use std::fmt::Write;
use std::fs;
use std::path::Path;

const WIDTH: f64 = 800.0;
const PADDING: f64 = 40.0;
const PANEL_HEIGHT: f64 = 160.0;
const PANEL_GAP: f64 = 30.0;
const DBS_GUIDE: f64 = 3.0;

struct Panel {
    title: String,
    top: f64,
    min: f64,
    max: f64,
}

impl Panel {
    fn y(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        let scale = if range > 0.0 { PANEL_HEIGHT / range } else { 1.0 };
        self.top + PANEL_HEIGHT - (value - self.min) * scale
    }

    fn bottom(&self) -> f64 {
        self.top + PANEL_HEIGHT
    }
}

fn x_at(index: usize, count: usize) -> f64 {
    let plot_width = WIDTH - 2.0 * PADDING;
    if count > 1 {
        PADDING + index as f64 * plot_width / (count - 1) as f64
    } else {
        PADDING
    }
}

/// Contiguous index runs where `tags[i] == sign`, as inclusive ranges.
fn tag_spans(tags: &[i8], sign: i8) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, &tag) in tags.iter().enumerate() {
        match (tag == sign, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, tags.len() - 1));
    }
    spans
}

/// Polyline point lists, broken wherever a value is undefined.
fn segments(values: &[Option<f64>], panel: &Panel) -> Vec<String> {
    let count = values.len();
    let mut out = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => current.push(format!("{:.1},{:.1}", x_at(i, count), panel.y(*v))),
            None if !current.is_empty() => out.push(std::mem::take(&mut current).join(" ")),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}

fn draw_panel(svg: &mut String, panel: &Panel, values: &[Option<f64>], color: &str, guides: &[f64]) {
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-size="12">{}</text>"#,
        PADDING,
        panel.top - 6.0,
        panel.title
    );
    let _ = writeln!(
        svg,
        r#"<rect x="{:.0}" y="{:.0}" width="{:.0}" height="{:.0}" fill="none" stroke="black"/>"#,
        PADDING,
        panel.top,
        WIDTH - 2.0 * PADDING,
        PANEL_HEIGHT
    );
    for guide in guides {
        let y = panel.y(*guide);
        let _ = writeln!(
            svg,
            r#"<line x1="{:.0}" y1="{:.1}" x2="{:.0}" y2="{:.1}" stroke="gray" stroke-dasharray="4 2"/>"#,
            PADDING,
            y,
            WIDTH - PADDING,
            y
        );
    }
    for points in segments(values, panel) {
        let _ = writeln!(
            svg,
            r#"<polyline fill="none" stroke="{}" stroke-width="1" points="{}"/>"#,
            color, points
        );
    }
}

pub fn format_dbs_chart(table: &DbsTable, limit: f64) -> String {
    if table.is_empty() {
        return "<svg xmlns=\"http://www.w3.org/2000/svg\"><text x=\"10\" y=\"20\">No Dbs data available.</text></svg>\n".to_string();
    }

    let count = table.len();
    let closes: Vec<Option<f64>> = table.rows.iter().map(|r| Some(r.reference.close)).collect();
    let dbs_ma: Vec<Option<f64>> = table.rows.iter().map(|r| r.dbs_ma).collect();
    let dbs: Vec<Option<f64>> = table.rows.iter().map(|r| r.dbs.map(f64::from)).collect();

    let min_close = closes.iter().flatten().copied().fold(f64::INFINITY, f64::min);
    let max_close = closes.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max);

    let panels = [
        Panel {
            title: table.symbol.clone(),
            top: PADDING,
            min: min_close,
            max: max_close,
        },
        Panel {
            title: "DbsMa".to_string(),
            top: PADDING + PANEL_HEIGHT + PANEL_GAP,
            min: -4.5,
            max: 4.5,
        },
        Panel {
            title: "Dbs".to_string(),
            top: PADDING + 2.0 * (PANEL_HEIGHT + PANEL_GAP),
            min: -4.5,
            max: 4.5,
        },
    ];
    let height = panels[2].bottom() + PADDING;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        WIDTH, height, WIDTH, height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);

    let tags = table.tags(limit);
    let step = if count > 1 { x_at(1, count) - x_at(0, count) } else { 0.0 };
    for (sign, color) in [(1i8, "red"), (-1i8, "green")] {
        for (start, end) in tag_spans(&tags, sign) {
            let x0 = x_at(start, count) - step / 2.0;
            let x1 = x_at(end, count) + step / 2.0;
            let _ = writeln!(
                svg,
                r#"<rect class="span" x="{:.1}" y="{:.0}" width="{:.1}" height="{:.0}" fill="{}" fill-opacity="0.2"/>"#,
                x0.max(PADDING),
                panels[0].top,
                (x1.min(WIDTH - PADDING) - x0.max(PADDING)).max(1.0),
                PANEL_HEIGHT,
                color
            );
        }
    }

    draw_panel(&mut svg, &panels[0], &closes, "black", &[]);
    draw_panel(&mut svg, &panels[1], &dbs_ma, "blue", &[limit, -limit]);
    draw_panel(&mut svg, &panels[2], &dbs, "purple", &[DBS_GUIDE, -DBS_GUIDE]);

    let first = table.rows[0].date();
    let last = table.rows[count - 1].date();
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-size="10">{}</text>"#,
        PADDING,
        height - 12.0,
        first
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-size="10" text-anchor="end">{}</text>"#,
        WIDTH - PADDING,
        height - 12.0,
        last
    );
    svg.push_str("</svg>\n");
    svg
}

pub struct SvgChartAdapter;

impl ChartPort for SvgChartAdapter {
    fn render(&self, table: &DbsTable, limit: f64, output_path: &Path) -> Result<(), MonitorError> {
        fs::write(output_path, format_dbs_chart(table, limit)).map_err(|e| MonitorError::Chart {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;
        log::info!("Chart written to {}", output_path.display());
        Ok(())
    }
}
