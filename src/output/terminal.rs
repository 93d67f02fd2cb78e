//! Human-readable formatting of timings.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::result::Measurement;

/// Unit for printing times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Nanoseconds.
    Nsec,
    /// Microseconds.
    Usec,
    /// Milliseconds.
    Msec,
    /// Seconds.
    Sec,
}

impl TimeUnit {
    /// Seconds per unit.
    pub fn scale(self) -> f64 {
        match self {
            TimeUnit::Nsec => 1e-9,
            TimeUnit::Usec => 1e-6,
            TimeUnit::Msec => 1e-3,
            TimeUnit::Sec => 1.0,
        }
    }

    /// Label printed after the number.
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Nsec => "nsec",
            TimeUnit::Usec => "usec",
            TimeUnit::Msec => "msec",
            TimeUnit::Sec => "sec",
        }
    }

    /// Largest unit in which `seconds` is at least 1, or nsec for anything smaller.
    pub fn for_duration(seconds: f64) -> Self {
        [TimeUnit::Sec, TimeUnit::Msec, TimeUnit::Usec, TimeUnit::Nsec]
            .into_iter()
            .find(|unit| seconds >= unit.scale())
            .unwrap_or(TimeUnit::Nsec)
    }
}

/// Format `value` with `precision` significant digits, like C's `%.*g`.
///
/// Fixed notation is used when the decimal exponent is in `-4..precision`,
/// scientific otherwise; trailing zeros are removed in both.
pub fn format_g(value: f64, precision: usize) -> String {
    let precision = precision.max(1);

    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to `precision` digits first gives the exponent %g decides on.
    let sci = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    if exp < -4 || exp >= precision as i32 {
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            if exp < 0 { '-' } else { '+' },
            exp.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value))
    }
}

fn strip_trailing_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Format a duration in seconds, scaled to `unit` or to the best-fitting unit.
pub fn format_time(seconds: f64, unit: Option<TimeUnit>, precision: usize) -> String {
    let unit = unit.unwrap_or_else(|| TimeUnit::for_duration(seconds));
    format!("{} {}", format_g(seconds / unit.scale(), precision), unit.name())
}

/// One autorange trial: `"{n} loops -> {secs} secs"`.
pub fn format_trial(number: usize, seconds: f64, precision: usize) -> String {
    format!(
        "{} loop{} -> {} secs",
        number,
        plural(number),
        format_g(seconds, precision)
    )
}

/// The headline: `"{n} loops, best of {r}: {time} per loop"`.
pub fn format_summary(m: &Measurement, unit: Option<TimeUnit>, precision: usize) -> String {
    format!(
        "{} loop{}, best of {}: {} per loop",
        m.number,
        plural(m.number),
        m.repeat,
        format_time(m.best, unit, precision)
    )
}

/// Every trial's total time: `"raw times: a, b, c"`.
pub fn format_raw(m: &Measurement, unit: Option<TimeUnit>, precision: usize) -> String {
    let times: Vec<String> = m
        .raw_timings
        .iter()
        .map(|&t| format_time(t, unit, precision))
        .collect();
    format!("raw times: {}", times.join(", "))
}

/// Warning text when the slowest trial is at least four times the fastest.
pub fn unreliable_warning(
    m: &Measurement,
    unit: Option<TimeUnit>,
    precision: usize,
) -> Option<String> {
    if !m.is_unreliable() {
        return None;
    }
    Some(format!(
        "The test results are likely unreliable. The worst time ({}) was more than \
         four times slower than the best time ({}).",
        format_time(m.worst, unit, precision),
        format_time(m.best, unit, precision)
    ))
}

/// Render an error and its chain of causes, one per line.
pub fn format_failure(err: &(dyn std::error::Error + 'static)) -> String {
    let mut output = format!("{} {}\n", "error:".red().bold(), err);
    let mut source = err.source();
    while let Some(cause) = source {
        output.push_str(&format!("  {} {}\n", "caused by:".yellow(), cause));
        source = cause.source();
    }
    output
}
