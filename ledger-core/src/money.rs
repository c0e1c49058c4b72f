//! Monetary text handling: bank exports write amounts like `"582,827.75"`.

/// Parse an amount cell, stripping comma thousands separators.
///
/// An empty cell reads as `0.0`. Anything else that does not convert to a
/// finite number is rejected with a short reason.
pub fn parse_amount(raw: &str) -> Result<f64, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(0.0);
    }

    let cleaned = s.replace(',', "");
    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;

    // f64 parsing accepts "nan" and "inf"
    if !value.is_finite() {
        return Err(format!("'{s}' is not a finite amount"));
    }
    Ok(value)
}

/// Render an amount as a plain decimal with no thousands separators.
/// Integral values keep one decimal place (`0.0`, `12.0`).
pub fn format_amount(value: f64) -> String {
    let value = value + 0.0; // normalize -0.0
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
