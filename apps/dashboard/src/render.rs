//! Text renderer: draws both charts as horizontal bars.

use std::io::Write;

use chrono::NaiveDateTime;

use partcount_charts::series::{CATEGORY_DATASET_LABEL, SCALAR_DATASET_LABEL};
use partcount_charts::{ChartId, Color, RenderSink, ScalarSlot};
use partcount_protocol::constants::{DATE_FORMAT, TIME_FORMAT};

/// Width in cells of the longest bar.
const BAR_WIDTH: usize = 40;

/// [`RenderSink`] writing a text frame of the redrawn chart to `out`.
///
/// The category chart is scaled to its largest value. The scalar chart has
/// no reference value, so its bar is always full once non-zero. A chart
/// title carries the station time of its latest stamped reading.
pub struct TerminalSink<W: Write> {
    out: W,
    categories: Vec<(String, f64, Color)>,
    categories_at: Option<NaiveDateTime>,
    scalar: (String, f64, Color),
    scalar_at: Option<NaiveDateTime>,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        let slot = ScalarSlot::new();
        Self {
            out,
            categories: Vec::new(),
            categories_at: None,
            scalar: (slot.label().to_string(), slot.value(), slot.color()),
            scalar_at: None,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn draw_categories(&mut self) -> std::io::Result<()> {
        let max = self
            .categories
            .iter()
            .map(|(_, v, _)| *v)
            .fold(0.0_f64, f64::max);
        let label_width = self
            .categories
            .iter()
            .map(|(l, _, _)| l.chars().count())
            .max()
            .unwrap_or(0);

        write_title(&mut self.out, CATEGORY_DATASET_LABEL, self.categories_at)?;
        for (label, value, color) in &self.categories {
            let cells = bar_cells(*value, max);
            writeln!(
                self.out,
                "  {label:<label_width$} {bar:<BAR_WIDTH$} {value} ({color})",
                bar = "█".repeat(cells),
            )?;
        }
        self.out.flush()
    }

    fn draw_scalar(&mut self) -> std::io::Result<()> {
        let (label, value, color) = &self.scalar;
        let cells = bar_cells(*value, *value);
        write_title(&mut self.out, SCALAR_DATASET_LABEL, self.scalar_at)?;
        writeln!(
            self.out,
            "  {label} {bar:<BAR_WIDTH$} {value} ({color})",
            bar = "█".repeat(cells),
        )?;
        self.out.flush()
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn set_categories(&mut self, labels: &[&str], values: &[f64], colors: &[Color]) {
        self.categories = labels
            .iter()
            .zip(values)
            .zip(colors)
            .map(|((label, value), color)| (label.to_string(), *value, *color))
            .collect();
    }

    fn set_scalar(&mut self, label: &str, value: f64, color: Color) {
        self.scalar = (label.to_string(), value, color);
    }

    fn set_updated_at(&mut self, chart: ChartId, at: NaiveDateTime) {
        match chart {
            ChartId::Category => self.categories_at = Some(at),
            ChartId::Scalar => self.scalar_at = Some(at),
        }
    }

    fn redraw(&mut self, chart: ChartId) {
        let result = match chart {
            ChartId::Category => self.draw_categories(),
            ChartId::Scalar => self.draw_scalar(),
        };
        if let Err(e) = result {
            tracing::warn!(?chart, "failed to draw chart: {e}");
        }
    }
}

/// Writes a chart title, followed by the station time when known.
fn write_title(
    out: &mut impl Write,
    title: &str,
    at: Option<NaiveDateTime>,
) -> std::io::Result<()> {
    match at {
        Some(at) => writeln!(
            out,
            "{title}  [{} {}]",
            at.format(DATE_FORMAT),
            at.format(TIME_FORMAT)
        ),
        None => writeln!(out, "{title}"),
    }
}

/// Number of bar cells for `value` on a scale topping out at `max`.
fn bar_cells(value: f64, max: f64) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max) * BAR_WIDTH as f64).round() as usize
}
