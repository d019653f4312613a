use crate::error::{Result, ScheduleError};

/// Expand a raw hour/minute field into the ordered set of values it covers.
///
/// Rules: blank input means `{0}`, `*` the full `0..=max_value` range,
/// `*/N` every Nth value starting at 0, and a plain integer a singleton
/// (range-checked). Everything else is an error so the caller can skip the
/// offending row.
pub fn expand(expr: &str, max_value: u8) -> Result<Vec<u8>> {
    let expr = expr.trim();

    if expr.is_empty() {
        return Ok(vec![0]);
    }

    if expr == "*" {
        return Ok((0..=max_value).collect());
    }

    if let Some(step_raw) = expr.strip_prefix("*/") {
        let step: i64 = step_raw
            .trim()
            .parse()
            .map_err(|_| invalid(expr))?;
        if step <= 0 {
            return Err(invalid(expr));
        }
        return Ok((0..=max_value).step_by(step as usize).collect());
    }

    let value: i64 = expr.parse().map_err(|_| invalid(expr))?;
    if value < 0 || value > max_value as i64 {
        return Err(ScheduleError::OutOfRange {
            value,
            max: max_value,
        });
    }
    Ok(vec![value as u8])
}

fn invalid(expr: &str) -> ScheduleError {
    ScheduleError::InvalidExpression {
        expr: expr.to_string(),
    }
}
