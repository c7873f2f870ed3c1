//! Small floating-point helpers shared by the codecs and summaries.

/// Round `value` to `decimals` places, half away from zero.
#[expect(
    clippy::float_arithmetic,
    reason = "decimal rounding scales, rounds and rescales"
)]
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Clamp into `0.0..=1.0`, mapping NaN to zero.
pub(crate) const fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.123_456_7, 6, 0.123_457)]
    #[case(12.346, 2, 12.35)]
    #[case(-0.127_8, 6, -0.127_8)]
    #[case(3.0, 1, 3.0)]
    fn rounds_to_requested_places(#[case] value: f64, #[case] decimals: i32, #[case] expected: f64) {
        assert!((round_to(value, decimals) - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(-3.0, 0.0)]
    #[case(0.25, 0.25)]
    #[case(f64::INFINITY, 1.0)]
    fn clamps_into_unit_interval(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(clamp_unit(value), expected);
    }
}
