//! Pure helper functions for extracting typed parameters from a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. If the key is
//! missing or the value is not the expected type, the default is returned.
//! The `_in` variants additionally clamp into an inclusive range, which is how
//! engines enforce their parameter bounds at the configuration boundary.
//! These never fail.

use serde_json::Value;
use std::ops::RangeInclusive;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
/// Non-finite results fall back to `default`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Only succeeds if the JSON value is a non-negative integer that fits in `u64`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `u32` from `params[name]`, returning `default` if missing, wrong
/// type, or too large.
pub fn param_u32(params: &Value, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

/// Like [`param_f64`], then clamped into `range`.
pub fn param_f64_in(params: &Value, name: &str, default: f64, range: RangeInclusive<f64>) -> f64 {
    param_f64(params, name, default).clamp(*range.start(), *range.end())
}

/// Like [`param_usize`], then clamped into `range`.
///
/// Negative integers are treated as "below range" and clamp to the minimum
/// rather than falling back to `default`.
pub fn param_usize_in(
    params: &Value,
    name: &str,
    default: usize,
    range: RangeInclusive<usize>,
) -> usize {
    let value = match params.get(name).and_then(Value::as_i64) {
        Some(v) if v < 0 => *range.start(),
        _ => param_usize(params, name, default),
    };
    value.clamp(*range.start(), *range.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"speed": 2.5});
        assert!((param_f64(&params, "speed", 1.0) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"count": 10});
        assert!((param_f64(&params, "count", 0.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_key_missing() {
        let params = json!({"other": 1.0});
        assert!((param_f64(&params, "speed", 3.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_wrong_type() {
        let params = json!({"speed": "fast"});
        assert!((param_f64(&params, "speed", 1.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "speed", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    // -- param_usize / param_u32 --

    #[test]
    fn param_usize_extracts_existing_integer() {
        let params = json!({"count": 42});
        assert_eq!(param_usize(&params, "count", 0), 42);
    }

    #[test]
    fn param_usize_returns_default_for_float_value() {
        let params = json!({"count": 2.5});
        assert_eq!(param_usize(&params, "count", 99), 99);
    }

    #[test]
    fn param_usize_returns_default_for_negative_integer() {
        let params = json!({"count": -1});
        assert_eq!(param_usize(&params, "count", 5), 5);
    }

    #[test]
    fn param_u32_rejects_values_above_u32_max() {
        let params = json!({"seed": u64::from(u32::MAX) + 1});
        assert_eq!(param_u32(&params, "seed", 3), 3);
        let params = json!({"seed": 17});
        assert_eq!(param_u32(&params, "seed", 3), 17);
    }

    // -- clamped variants --

    #[test]
    fn param_f64_in_clamps_above_and_below() {
        let params = json!({"hi": 9.0, "lo": -9.0, "ok": 0.5});
        assert_eq!(param_f64_in(&params, "hi", 0.5, 0.0..=1.0), 1.0);
        assert_eq!(param_f64_in(&params, "lo", 0.5, 0.0..=1.0), 0.0);
        assert_eq!(param_f64_in(&params, "ok", 0.1, 0.0..=1.0), 0.5);
    }

    #[test]
    fn param_f64_in_missing_key_uses_default() {
        assert_eq!(param_f64_in(&json!({}), "x", 0.25, 0.0..=1.0), 0.25);
    }

    #[test]
    fn param_usize_in_clamps_small_values_up() {
        let params = json!({"num_points": 3});
        assert_eq!(param_usize_in(&params, "num_points", 100, 4..=500), 4);
    }

    #[test]
    fn param_usize_in_clamps_negative_to_minimum() {
        let params = json!({"num_points": -20});
        assert_eq!(param_usize_in(&params, "num_points", 100, 4..=500), 4);
    }

    #[test]
    fn param_usize_in_clamps_large_values_down() {
        let params = json!({"num_points": 10_000});
        assert_eq!(param_usize_in(&params, "num_points", 100, 4..=500), 500);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn param_f64_in_always_within_range(v in -1e9_f64..1e9, lo in -10.0_f64..0.0, hi in 0.0_f64..10.0) {
                let params = json!({ "v": v });
                let out = param_f64_in(&params, "v", 0.0, lo..=hi);
                prop_assert!(out >= lo && out <= hi, "{out} outside [{lo}, {hi}]");
            }

            #[test]
            fn param_usize_in_always_within_range(v in -1000_i64..100_000, lo in 0_usize..10, span in 0_usize..1000) {
                let hi = lo + span;
                let params = json!({ "v": v });
                let out = param_usize_in(&params, "v", lo, lo..=hi);
                prop_assert!(out >= lo && out <= hi, "{out} outside [{lo}, {hi}]");
            }
        }
    }
}
