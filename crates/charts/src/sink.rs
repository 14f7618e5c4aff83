//! Rendering capability the reconciler draws through.

use chrono::NaiveDateTime;

use crate::palette::Color;

/// Which of the two charts a redraw targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartId {
    /// Parts per size class (ultrasonic sensor).
    Category,
    /// Encoder hit count.
    Scalar,
}

/// A chart renderer.
///
/// The reconciler pushes the full current data of a chart and then asks for
/// a redraw of that chart. Implementations only read what they are handed.
pub trait RenderSink {
    /// Replaces the category chart's data. The three slices have equal length.
    fn set_categories(&mut self, labels: &[&str], values: &[f64], colors: &[Color]);

    /// Replaces the scalar chart's single bar.
    fn set_scalar(&mut self, label: &str, value: f64, color: Color);

    /// Station time of the reading behind the chart's latest update. Only
    /// called for stamped readings, before the matching redraw.
    fn set_updated_at(&mut self, chart: ChartId, at: NaiveDateTime);

    /// Redraws one chart from the data last set.
    fn redraw(&mut self, chart: ChartId);
}
