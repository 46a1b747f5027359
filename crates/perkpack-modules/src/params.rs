//! Lenient accessors over a module's loose parameter map
//!
//! Every accessor takes the field's default and returns it whenever the key
//! is absent or its value cannot be read as the expected shape.

use perkpack_core::{BuffGraph, MultiplierCurve, Value, ValueMap};

/// Read-only view of a parameter map
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    map: Option<&'a ValueMap>,
}

impl<'a> Params<'a> {
    pub fn new(map: Option<&'a ValueMap>) -> Self {
        Self { map }
    }

    pub fn empty() -> Self {
        Self { map: None }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.and_then(|map| map.get(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.get(key)
            .and_then(Value::coerce_f64)
            .map(|v| v as f32)
            .unwrap_or(default)
    }

    pub fn i64_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::coerce_i64).unwrap_or(default)
    }

    /// Non-negative integer; negative input keeps the default
    pub fn u32_or(&self, key: &str, default: u32) -> u32 {
        self.get(key)
            .and_then(Value::coerce_i64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::coerce_bool).unwrap_or(default)
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::coerce_string)
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.string(key).unwrap_or_else(|| default.to_string())
    }

    /// Non-blank string, or `None`
    pub fn non_blank(&self, key: &str) -> Option<String> {
        self.string(key).filter(|s| !s.trim().is_empty())
    }

    pub fn string_list_or(&self, key: &str, default: &[&str]) -> Vec<String> {
        self.get(key)
            .and_then(Value::coerce_string_list)
            .unwrap_or_else(|| default.iter().map(|s| s.to_string()).collect())
    }

    pub fn f32_list(&self, key: &str) -> Option<Vec<f32>> {
        self.get(key)
            .and_then(Value::coerce_f64_list)
            .map(|values| values.into_iter().map(|v| v as f32).collect())
    }

    /// Curve from evenly spaced control values
    pub fn curve_or(&self, key: &str, default: MultiplierCurve) -> MultiplierCurve {
        match self.f32_list(key) {
            Some(values) if values.len() >= 2 => MultiplierCurve::from_values(&values),
            _ => default,
        }
    }

    /// Nested buff graph map
    pub fn buff(&self, key: &str) -> Option<BuffGraph> {
        self.get(key).and_then(BuffGraph::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, Value)]) -> ValueMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_absent_map_yields_defaults() {
        let params = Params::empty();
        assert_eq!(params.f32_or("removeTime", 30.0), 30.0);
        assert!(params.bool_or("canStack", true));
        assert_eq!(params.string_list_or("ids", &["food"]), vec!["food".to_string()]);
        assert!(params.buff("buff").is_none());
    }

    #[test]
    fn test_mistyped_values_keep_defaults() {
        let values = map(&[
            ("removeTime", Value::from("soon")),
            ("numberToSpawn", Value::Int(-2)),
            ("canStack", Value::List(vec![])),
            ("ids", Value::from("food")),
        ]);
        let params = Params::new(Some(&values));
        assert_eq!(params.f32_or("removeTime", 30.0), 30.0);
        assert_eq!(params.u32_or("numberToSpawn", 1), 1);
        assert!(!params.bool_or("canStack", false));
        assert_eq!(params.string_list_or("ids", &["food"]), vec!["food".to_string()]);
    }

    #[test]
    fn test_text_numbers_are_read() {
        let values = map(&[
            ("removeTime", Value::from("12.5")),
            ("numberToSpawn", Value::from("3")),
            ("canStack", Value::from("True")),
        ]);
        let params = Params::new(Some(&values));
        assert_eq!(params.f32_or("removeTime", 30.0), 12.5);
        assert_eq!(params.u32_or("numberToSpawn", 1), 3);
        assert!(params.bool_or("canStack", false));
    }

    #[test]
    fn test_curve_needs_two_points() {
        let values = map(&[
            ("short", Value::List(vec![Value::Float(2.0)])),
            ("ramp", Value::List(vec![Value::Int(0), Value::Int(4)])),
        ]);
        let params = Params::new(Some(&values));
        let default = MultiplierCurve::linear(0.0, 0.0, 1.0, 1.0);
        assert_eq!(params.curve_or("short", default.clone()), default);
        assert_eq!(params.curve_or("ramp", default).evaluate(0.5), 2.0);
    }
}
