use chrono::NaiveDateTime;
use tracing::trace;

use partcount_protocol::{Frame, MeasurementEvent};

use crate::series::{CategorySeries, ScalarSlot, Upsert};
use crate::sink::{ChartId, RenderSink};

/// Owner of both chart models.
///
/// Each event mutates exactly one chart and triggers exactly one redraw of
/// it. Updates are applied synchronously in call order; nothing is
/// coalesced.
#[derive(Debug)]
pub struct ChartReconciler<S> {
    categories: CategorySeries,
    scalar: ScalarSlot,
    category_updated_at: Option<NaiveDateTime>,
    scalar_updated_at: Option<NaiveDateTime>,
    sink: S,
}

impl<S: RenderSink> ChartReconciler<S> {
    /// Creates empty charts (no categories, scalar at zero) drawing to `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            categories: CategorySeries::new(),
            scalar: ScalarSlot::new(),
            category_updated_at: None,
            scalar_updated_at: None,
            sink,
        }
    }

    /// Applies one measurement and redraws the chart it touched.
    pub fn handle(&mut self, event: &MeasurementEvent) {
        match event {
            MeasurementEvent::CategoryCount { category, count } => {
                match self.categories.upsert(category, *count) {
                    Upsert::Inserted(index) => {
                        trace!(category = %category, index, count, "new category");
                    }
                    Upsert::Updated(index) => {
                        trace!(category = %category, index, count, "category updated");
                    }
                }
                let labels = self.categories.labels();
                let values = self.categories.values();
                let colors = self.categories.colors();
                self.sink.set_categories(&labels, &values, &colors);
                self.sink.redraw(ChartId::Category);
            }
            MeasurementEvent::ScalarCount { count } => {
                self.scalar.set(*count);
                trace!(count, "scalar updated");
                self.sink
                    .set_scalar(self.scalar.label(), self.scalar.value(), self.scalar.color());
                self.sink.redraw(ChartId::Scalar);
            }
        }
    }

    /// Like [`handle`](Self::handle), also remembering the station's stamp
    /// for the chart that changed and handing it to the sink.
    pub fn handle_frame(&mut self, frame: &Frame) {
        if let Some(stamp) = frame.captured_at {
            let chart = match frame.event {
                MeasurementEvent::CategoryCount { .. } => {
                    self.category_updated_at = Some(stamp);
                    ChartId::Category
                }
                MeasurementEvent::ScalarCount { .. } => {
                    self.scalar_updated_at = Some(stamp);
                    ChartId::Scalar
                }
            };
            self.sink.set_updated_at(chart, stamp);
        }
        self.handle(&frame.event);
    }

    pub fn categories(&self) -> &CategorySeries {
        &self.categories
    }

    pub fn scalar(&self) -> &ScalarSlot {
        &self.scalar
    }

    /// Station time of the latest stamped category reading.
    pub fn category_updated_at(&self) -> Option<NaiveDateTime> {
        self.category_updated_at
    }

    /// Station time of the latest stamped encoder reading.
    pub fn scalar_updated_at(&self) -> Option<NaiveDateTime> {
        self.scalar_updated_at
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
