use proptest::prelude::*;
use toolbench_core::data::shape::{ShapeKind, ToolShape};
use toolbench_core::units::{format_length, parse_length, MeasurementSystem};

proptest! {
    #[test]
    fn formatted_lengths_parse_back(mm in -1000.0f64..1000.0) {
        for system in [MeasurementSystem::Metric, MeasurementSystem::Imperial] {
            let text = format_length(mm, system);
            let parsed = parse_length(&text, MeasurementSystem::Metric).unwrap();
            // three decimals of the displayed unit
            prop_assert!((parsed - mm).abs() <= 0.0005 * 25.4 + 1e-9, "{} -> {}", text, parsed);
        }
    }

    #[test]
    fn invalid_text_never_changes_a_parameter(text in "[a-z]{1,8}") {
        let mut shape = ToolShape::builtin(ShapeKind::Endmill);
        let before = shape.clone();
        prop_assert!(shape
            .set_param_from_str("Diameter", &text, MeasurementSystem::Metric)
            .is_err());
        prop_assert_eq!(shape, before);
    }
}
