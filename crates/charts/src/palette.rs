use std::fmt;

/// Display color as a CSS-style hex string (`#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub &'static str);

impl Color {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const LARGE: Color = Color("#fcff32ff");
pub const MEDIUM: Color = Color("#34e758ff");
pub const SMALL: Color = Color("#ba66f5ff");
/// Color for any category the station did not ship with.
pub const FALLBACK: Color = Color("#999999");
/// Bar color of the encoder chart.
pub const SCALAR: Color = Color("#0077ff");

/// Maps a part category to its bar color.
///
/// Pure and total: the station's three size classes have fixed colors,
/// everything else gets [`FALLBACK`]. Matching is exact (case-sensitive).
pub fn color_for_category(label: &str) -> Color {
    match label {
        "Grande" => LARGE,
        "Media" => MEDIUM,
        "Pequena" => SMALL,
        _ => FALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories() {
        assert_eq!(color_for_category("Grande").as_str(), "#fcff32ff");
        assert_eq!(color_for_category("Media").as_str(), "#34e758ff");
        assert_eq!(color_for_category("Pequena").as_str(), "#ba66f5ff");
    }

    #[test]
    fn unknown_categories_fall_back() {
        for label in ["", "grande", "Média", "Enorme", "Grande "] {
            assert_eq!(color_for_category(label), FALLBACK, "label {label:?}");
        }
    }

    #[test]
    fn repeated_calls_are_stable() {
        for label in ["Grande", "Media", "Pequena", "Outra"] {
            let first = color_for_category(label);
            for _ in 0..100 {
                assert_eq!(color_for_category(label), first);
            }
        }
    }

    #[test]
    fn display_writes_hex() {
        assert_eq!(SCALAR.to_string(), "#0077ff");
    }
}
