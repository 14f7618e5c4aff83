pub mod palette;
pub mod reconciler;
pub mod series;
pub mod sink;

pub use palette::{Color, color_for_category};
pub use reconciler::ChartReconciler;
pub use series::{CategoryEntry, CategorySeries, ScalarSlot, Upsert};
pub use sink::{ChartId, RenderSink};
