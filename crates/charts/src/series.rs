use crate::palette::{self, Color};

/// Title of the category (ultrasonic) chart's dataset.
pub const CATEGORY_DATASET_LABEL: &str = "Quantidade de Peças";
/// Title of the scalar (encoder) chart's dataset.
pub const SCALAR_DATASET_LABEL: &str = "Encoder";
/// Label of the scalar chart's only bar.
pub const SCALAR_SLOT_LABEL: &str = "Contagem";

/// One bar of the category chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEntry {
    pub label: String,
    pub value: f64,
    pub color: Color,
}

/// Outcome of [`CategorySeries::upsert`], carrying the entry's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted(usize),
    Updated(usize),
}

/// Label-keyed bars in first-seen order.
///
/// Labels are unique. A repeated label overwrites the value in place; the
/// color picked at insertion is never recomputed.
#[derive(Debug, Clone, Default)]
pub struct CategorySeries {
    entries: Vec<CategoryEntry>,
}

impl CategorySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the value for `label`, or appends a new entry colored by
    /// [`palette::color_for_category`].
    pub fn upsert(&mut self, label: &str, value: f64) -> Upsert {
        // Linear scan: the station reports a handful of size classes.
        if let Some(index) = self.position(label) {
            self.entries[index].value = value;
            return Upsert::Updated(index);
        }
        self.entries.push(CategoryEntry {
            label: label.to_owned(),
            value,
            color: palette::color_for_category(label),
        });
        Upsert::Inserted(self.entries.len() - 1)
    }

    /// Index of `label`, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.label == label)
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    pub fn colors(&self) -> Vec<Color> {
        self.entries.iter().map(|e| e.color).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The encoder chart: exactly one bar, starting at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSlot {
    value: f64,
}

impl ScalarSlot {
    pub fn new() -> Self {
        Self { value: 0.0 }
    }

    pub fn set(&mut self, value: f64) {
        self.value = value;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label(&self) -> &'static str {
        SCALAR_SLOT_LABEL
    }

    pub fn color(&self) -> Color {
        palette::SCALAR
    }
}

impl Default for ScalarSlot {
    fn default() -> Self {
        Self::new()
    }
}
