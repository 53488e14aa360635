//! Duration strings.
//!
//! Step `delay` and `interval` values use the compact notation familiar from
//! Go tooling: a sequence of decimal numbers, each with a unit suffix.
//!
//! ```
//! use std::time::Duration;
//! use sheryl::config::{format_duration, parse_duration};
//!
//! assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
//! assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
//! assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
//! ```

use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parse a duration string such as `300ms`, `1.5h` or `2h45m`.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. The bare
/// string `0` is accepted without a unit. Negative durations are rejected.
pub fn parse_duration(input: &str) -> std::result::Result<Duration, String> {
    let s = input.trim();
    let s = s.strip_prefix('+').unwrap_or(s);

    if s.starts_with('-') {
        return Err("negative durations are not allowed".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u128 = 0;
    let mut rest = s;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);

        let (whole, fraction) = match number.split_once('.') {
            Some((w, f)) => (w, f),
            None => (number, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(format!("missing number before '{}'", tail));
        }
        if fraction.contains('.') {
            return Err(format!("malformed number '{}'", number));
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        if unit.is_empty() {
            return Err(format!("missing unit after '{}'", number));
        }
        let multiplier = unit_nanos(unit).ok_or_else(|| format!("unknown unit '{}'", unit))?;

        let whole_value: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| format!("malformed number '{}'", number))?
        };
        let mut value = whole_value
            .checked_mul(multiplier)
            .ok_or_else(|| "duration out of range".to_string())?;

        if !fraction.is_empty() {
            // Digits past nanosecond precision cannot contribute.
            let digits = &fraction[..fraction.len().min(18)];
            let numerator: u128 = digits
                .parse()
                .map_err(|_| format!("malformed number '{}'", number))?;
            let scale = 10u128.pow(digits.len() as u32);
            value += numerator * multiplier / scale;
        }

        total = total
            .checked_add(value)
            .ok_or_else(|| "duration out of range".to_string())?;
        rest = next;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| "duration out of range")?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// Format a duration in the same notation [`parse_duration`] accepts.
///
/// Sub-second values use the largest fitting unit (`850ms`, `1.2µs`);
/// longer values are split into hours, minutes and seconds (`1h2m3.5s`).
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{}ns", nanos);
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", fractional(nanos, NANOS_PER_MICRO, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", fractional(nanos, NANOS_PER_MILLI, 6));
    }

    let total_secs = nanos / NANOS_PER_SEC;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs_nanos = nanos % (60 * NANOS_PER_SEC);

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&format!("{}s", fractional(secs_nanos, NANOS_PER_SEC, 9)));
    out
}

fn fractional(value: u128, unit: u128, width: usize) -> String {
    let whole = value / unit;
    let rem = value % unit;
    if rem == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", rem, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
