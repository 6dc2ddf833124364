//! Plain-text and HTML renderings of an assembled report.
//!
//! Renderers are pure string builders over the plan and rows. Values
//! are held at full precision upstream; rounding to two decimals
//! happens only here.

use time::Date;

use crate::report::{ReportPlan, ReportRow};

/// Two-way gain/loss classification. Zero counts as a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Gain,
    Loss,
}

impl Movement {
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Gain => "gain",
            Self::Loss => "loss",
        }
    }
}

pub fn classify(percent: f64) -> Movement {
    if percent > 0.0 {
        Movement::Gain
    } else {
        Movement::Loss
    }
}

/// CSS colors for the two movement classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub gain: &'static str,
    pub loss: &'static str,
}

impl Palette {
    /// Gains red, losses green, as East Asian market displays color them.
    pub const RED_GAIN: Self = Self {
        gain: "red",
        loss: "green",
    };

    /// Gains green, losses red.
    pub const GREEN_GAIN: Self = Self {
        gain: "green",
        loss: "red",
    };

    pub const fn color_for(self, movement: Movement) -> &'static str {
        match movement {
            Movement::Gain => self.gain,
            Movement::Loss => self.loss,
        }
    }
}

/// Fixed-width table rendering for the plain-text message part.
pub fn render_text(
    plan: &ReportPlan,
    generated_at: Date,
    rows: &[ReportRow],
    notice: Option<&str>,
) -> String {
    let mut out = String::new();
    out.push_str(&plan.title);
    out.push_str(" - ");
    out.push_str(&generated_at.to_string());
    out.push_str("\n\n");

    if let Some(notice) = notice {
        out.push_str(notice);
        out.push('\n');
        return out;
    }

    let mut headers: Vec<String> = vec![
        String::from("Name"),
        String::from("Close"),
        String::from("Target"),
    ];
    headers.extend(plan.horizons.iter().map(|h| h.label().to_owned()));

    let body_rows: Vec<Vec<String>> = rows.iter().map(text_cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &body_rows {
        for (index, cell) in cells.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    push_text_line(&mut out, &headers, &widths);
    let total = widths.iter().sum::<usize>() + (widths.len() - 1) * 2;
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for cells in &body_rows {
        push_text_line(&mut out, cells, &widths);
    }

    out
}

fn text_cells(row: &ReportRow) -> Vec<String> {
    let mut cells = Vec::with_capacity(3 + row.changes.len());
    cells.push(row.instrument.title.clone());
    cells.push(close_cell(row));
    cells.push(target_cell(row));
    for change in &row.changes {
        if row.is_placeholder() {
            cells.push(String::from("N/A"));
        } else {
            cells.push(format!("{:.2}%", change.percent));
        }
    }
    cells
}

fn close_cell(row: &ReportRow) -> String {
    match row.latest_close {
        Some(close) => format!("{close:.2} {}", row.currency.as_deref().unwrap_or("N/A")),
        None => String::from("N/A"),
    }
}

fn target_cell(row: &ReportRow) -> String {
    match row.instrument.target_price {
        Some(target) => format!("{target:.2}"),
        None => String::from("N/A"),
    }
}

fn push_text_line(out: &mut String, cells: &[String], widths: &[usize]) {
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            out.push_str("  ");
        }
        if index == 0 {
            out.push_str(&format!("{cell:<width$}"));
        } else {
            out.push_str(&format!("{cell:>width$}"));
        }
    }
    // Trailing spaces on the name-only rows are pointless; trim.
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

/// Self-contained HTML document for the mail body.
pub fn render_html(
    plan: &ReportPlan,
    generated_at: Date,
    rows: &[ReportRow],
    notice: Option<&str>,
) -> String {
    let columns = 3 + plan.horizons.len();
    let mut out = String::new();

    out.push_str("<html>\n<head>\n<style>\n");
    out.push_str("body { font-family: Arial, sans-serif; }\n");
    out.push_str("table { width: 100%; border-collapse: collapse; }\n");
    out.push_str(
        "th, td { padding: 8px; text-align: center; border-bottom: 1px solid #ddd; }\n",
    );
    out.push_str("th { background-color: #f4f4f4; }\n");
    out.push_str(&format!(".gain {{ color: {}; }}\n", plan.palette.gain));
    out.push_str(&format!(".loss {{ color: {}; }}\n", plan.palette.loss));
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str(&format!(
        "<h2>{} - {}</h2>\n",
        escape_html(&plan.title),
        generated_at
    ));
    out.push_str("<table>\n<tr>");
    out.push_str("<th>Name</th><th>Close</th><th>Target</th>");
    for horizon in &plan.horizons {
        out.push_str(&format!("<th>{}</th>", horizon.label()));
    }
    out.push_str("</tr>\n");

    if let Some(notice) = notice {
        out.push_str(&format!(
            "<tr><td colspan=\"{columns}\">{}</td></tr>\n",
            escape_html(notice)
        ));
    }

    for row in rows {
        out.push_str("<tr>");
        out.push_str(&format!("<td>{}</td>", escape_html(&row.instrument.title)));
        out.push_str(&format!("<td>{}</td>", escape_html(&close_cell(row))));
        out.push_str(&format!("<td>{}</td>", target_cell(row)));
        for change in &row.changes {
            if row.is_placeholder() {
                out.push_str("<td>N/A</td>");
            } else {
                let movement = classify(change.percent);
                out.push_str(&format!(
                    "<td class=\"{}\">{:.2}%</td>",
                    movement.css_class(),
                    change.percent
                ));
            }
        }
        out.push_str("</tr>\n");

        if let Some(chart) = &row.chart {
            out.push_str(&format!(
                "<tr><td colspan=\"{columns}\"><img src=\"{chart}\" alt=\"{} chart\"/></td></tr>\n",
                escape_html(&row.instrument.title)
            ));
        }
    }

    out.push_str("</table>\n</body>\n</html>\n");
    out
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeResult;
    use crate::{Horizon, Instrument, InstrumentKind, Symbol, UtcDateTime};

    fn as_of() -> Date {
        UtcDateTime::parse("2024-03-01T00:00:00Z")
            .expect("timestamp")
            .date()
    }

    fn instrument(title: &str, target: Option<f64>) -> Instrument {
        Instrument::new(
            Symbol::parse("AAPL").expect("symbol"),
            title,
            InstrumentKind::Equity,
            target,
            None,
        )
        .expect("instrument")
    }

    fn populated_row() -> ReportRow {
        ReportRow {
            instrument: instrument("Apple Inc.", Some(210.5)),
            latest_close: Some(187.5),
            currency: Some(String::from("USD")),
            changes: vec![
                ChangeResult::computed(Horizon::OneDay, 1.351),
                ChangeResult::computed(Horizon::OneWeek, -0.424),
                ChangeResult::unavailable(Horizon::OneMonth),
            ],
            chart: None,
        }
    }

    #[test]
    fn classify_treats_zero_as_loss() {
        assert_eq!(classify(0.0), Movement::Loss);
        assert_eq!(classify(-0.01), Movement::Loss);
        assert_eq!(classify(0.01), Movement::Gain);
    }

    #[test]
    fn default_palette_colors_gains_red() {
        assert_eq!(Palette::RED_GAIN.color_for(Movement::Gain), "red");
        assert_eq!(Palette::RED_GAIN.color_for(Movement::Loss), "green");
        assert_eq!(Palette::GREEN_GAIN.color_for(Movement::Gain), "green");
    }

    #[test]
    fn text_rendering_formats_values_to_two_decimals() {
        let plan = ReportPlan::default();
        let text = render_text(&plan, as_of(), &[populated_row()], None);

        assert!(text.starts_with("Daily Market Report - 2024-03-01"));
        assert!(text.contains("187.50 USD"));
        assert!(text.contains("210.50"));
        assert!(text.contains("1.35%"));
        assert!(text.contains("-0.42%"));
        // Unavailable changes keep the numeric default.
        assert!(text.contains("0.00%"));
    }

    #[test]
    fn text_rendering_marks_placeholder_rows() {
        let plan = ReportPlan::default();
        let row = ReportRow::placeholder(instrument("Ghost Corp.", None), &plan.horizons);
        let text = render_text(&plan, as_of(), &[row], None);

        assert!(text.contains("Ghost Corp."));
        assert!(text.contains("N/A"));
        assert!(!text.contains("0.00%"));
    }

    #[test]
    fn text_rendering_prefers_notice_over_rows() {
        let plan = ReportPlan::default();
        let text = render_text(&plan, as_of(), &[], Some("nothing could be fetched"));

        assert!(text.contains("nothing could be fetched"));
        assert!(!text.contains("Name"));
    }

    #[test]
    fn html_rendering_classes_follow_movement() {
        let plan = ReportPlan::default();
        let html = render_html(&plan, as_of(), &[populated_row()], None);

        assert!(html.contains(".gain { color: red; }"));
        assert!(html.contains(".loss { color: green; }"));
        assert!(html.contains("<td class=\"gain\">1.35%</td>"));
        assert!(html.contains("<td class=\"loss\">-0.42%</td>"));
        // Unavailable sentinel zero classifies as a loss.
        assert!(html.contains("<td class=\"loss\">0.00%</td>"));
        assert!(html.contains("<h2>Daily Market Report - 2024-03-01</h2>"));
        assert!(html.contains("border-collapse: collapse"));
        assert!(html.contains("background-color: #f4f4f4"));
    }

    #[test]
    fn html_rendering_escapes_catalog_titles() {
        let plan = ReportPlan::default();
        let mut row = populated_row();
        row.instrument.title = String::from("Procter & Gamble <Co>");
        let html = render_html(&plan, as_of(), &[row], None);

        assert!(html.contains("Procter &amp; Gamble &lt;Co&gt;"));
        assert!(!html.contains("<Co>"));
    }

    #[test]
    fn html_rendering_inverts_palette_when_asked() {
        let plan = ReportPlan::default().with_palette(Palette::GREEN_GAIN);
        let html = render_html(&plan, as_of(), &[populated_row()], None);

        assert!(html.contains(".gain { color: green; }"));
        assert!(html.contains(".loss { color: red; }"));
    }

    #[test]
    fn html_rendering_embeds_chart_rows_full_width() {
        let plan = ReportPlan::default();
        let mut row = populated_row();
        row.chart = Some(String::from("data:image/png;base64,QUJD"));
        let html = render_html(&plan, as_of(), &[row], None);

        assert!(html.contains("colspan=\"6\""));
        assert!(html.contains("src=\"data:image/png;base64,QUJD\""));
    }

    #[test]
    fn html_rendering_notice_spans_all_columns() {
        let plan = ReportPlan::default();
        let html = render_html(&plan, as_of(), &[], Some("provider outage"));

        assert!(html.contains("<td colspan=\"6\">provider outage</td>"));
    }
}
