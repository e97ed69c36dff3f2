use crate::errors::BaggingError;
use std::cmp::Ordering;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

pub fn fmt_vec_output(v: &[f64]) -> String {
    let mut res = String::new();
    if let Some(last) = v.len().checked_sub(1) {
        if last == 0 {
            return format!("{:.4}", v[0]);
        }
        for n in &v[..last] {
            res.push_str(format!("{:.4}", n).as_str());
            res.push_str(", ");
        }
        res.push_str(format!("{:.4}", &v[last]).as_str());
    }
    res
}

// Validation
pub fn validate_probability_parameter(value: f64, parameter: &str) -> Result<(), BaggingError> {
    validate_float_parameter(value, 0.0, 1.0, parameter)
}

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), BaggingError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(BaggingError::InvalidConfiguration(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_positive_int_parameter(value: usize, parameter: &str) -> Result<(), BaggingError> {
    if value == 0 {
        Err(BaggingError::InvalidConfiguration(
            parameter.to_string(),
            "a positive integer".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Sort a copy of the values, NaN-free input assumed.
pub fn sorted(v: &[f64]) -> Vec<f64> {
    let mut s = v.to_vec();
    s.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    s
}

/// Empirical quantiles of a vector, interpolating linearly between order statistics.
///
/// For `n` sorted values and quantile `q`, the position `h = (n - 1) * q` is
/// located and the result is `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
/// This matches the default (type 7) definition used by R and numpy.
///
/// * `v` - A vector of which to find quantiles for.
/// * `quantiles` - Quantiles to look for in the data, values from 0 to 1.
pub fn quantiles(v: &[f64], quantiles: &[f64]) -> Vec<f64> {
    if v.is_empty() {
        return Vec::new();
    }
    let s = sorted(v);
    let last = s.len() - 1;
    quantiles
        .iter()
        .map(|q| {
            let h = last as f64 * q;
            let lo = h.floor() as usize;
            let hi = usize::min(lo + 1, last);
            s[lo] + (h - lo as f64) * (s[hi] - s[lo])
        })
        .collect()
}

/// Mean of a slice, NaN for an empty one.
pub fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}
