fn main() {
    println!("Run `cargo test -p wire-compat` to check decoding of recorded station frames.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use chrono::NaiveDateTime;
    use serde::Deserialize;

    use partcount_charts::{ChartId, ChartReconciler, Color, RenderSink};
    use partcount_protocol::{MeasurementEvent, decode_frame};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Re-encodes a fixture value the way the station's firmware sends it:
    /// one compact JSON object per text frame.
    fn as_frame(value: &serde_json::Value) -> String {
        serde_json::to_string(value).unwrap()
    }

    #[derive(Debug, Deserialize)]
    struct Replay {
        frames: Vec<String>,
        expected: Expected,
    }

    #[derive(Debug, Deserialize)]
    struct Expected {
        categories: Vec<ExpectedCategory>,
        scalar: f64,
        dropped: usize,
    }

    #[derive(Debug, Deserialize)]
    struct ExpectedCategory {
        label: String,
        value: f64,
        color: String,
    }

    #[derive(Default)]
    struct CountingSink {
        redraws: usize,
    }

    impl RenderSink for CountingSink {
        fn set_categories(&mut self, _: &[&str], _: &[f64], _: &[Color]) {}
        fn set_scalar(&mut self, _: &str, _: f64, _: Color) {}
        fn set_updated_at(&mut self, _: ChartId, _: NaiveDateTime) {}
        fn redraw(&mut self, _: ChartId) {
            self.redraws += 1;
        }
    }

    #[test]
    fn fixture_ultrasonic_frames() {
        let fixture = load_fixture("ultrasonic_frames.json");
        let frames = fixture.as_array().expect("array of frames");
        let expected = [("Grande", 1.0), ("Media", 2.0), ("Pequena", 3.0)];
        assert_eq!(frames.len(), expected.len());

        for (value, (label, count)) in frames.iter().zip(expected) {
            let frame = decode_frame(&as_frame(value))
                .unwrap_or_else(|e| panic!("failed to decode {value}: {e}"));
            assert_eq!(
                frame.event,
                MeasurementEvent::CategoryCount {
                    category: label.into(),
                    count,
                }
            );
            let stamp = frame.captured_at.expect("station stamp");
            assert_eq!(stamp.to_string(), "2025-11-07 14:03:09");
        }
    }

    #[test]
    fn fixture_encoder_frame() {
        let fixture = load_fixture("encoder_frame.json");
        let frame = decode_frame(&as_frame(&fixture)).unwrap();
        assert_eq!(frame.event, MeasurementEvent::ScalarCount { count: 4.0 });
        assert_eq!(
            frame.captured_at.map(|t| t.to_string()).as_deref(),
            Some("2025-11-07 14:05:41")
        );
    }

    #[test]
    fn fixture_session_replay() {
        let replay: Replay = serde_json::from_value(load_fixture("session_replay.json")).unwrap();
        let mut charts = ChartReconciler::new(CountingSink::default());

        let mut dropped = 0;
        for text in &replay.frames {
            match decode_frame(text) {
                Ok(frame) => charts.handle_frame(&frame),
                Err(_) => dropped += 1,
            }
        }

        assert_eq!(dropped, replay.expected.dropped);
        assert_eq!(charts.sink().redraws, replay.frames.len() - dropped);

        let got: Vec<(&str, f64, &str)> = charts
            .categories()
            .entries()
            .iter()
            .map(|e| (e.label.as_str(), e.value, e.color.as_str()))
            .collect();
        let want: Vec<(&str, f64, &str)> = replay
            .expected
            .categories
            .iter()
            .map(|c| (c.label.as_str(), c.value, c.color.as_str()))
            .collect();
        assert_eq!(got, want);
        assert_eq!(charts.scalar().value(), replay.expected.scalar);
    }
}
