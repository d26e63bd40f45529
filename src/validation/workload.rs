use super::FormatError;

/// A submitted workload in `H.MM` form.
///
/// The fractional digits are a literal minute count rather than a decimal
/// fraction: `1.45` is one hour and forty-five minutes. A single fractional
/// digit is right-padded, so `1.5` reads as one hour and fifty minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    normalized: String,
    hours: f64,
    fraction: String,
    minutes: f64,
}

impl Workload {
    /// Parses a workload using either `,` or `.` as the decimal separator.
    pub fn parse(raw: &str) -> Result<Self, FormatError> {
        let mut normalized = raw.trim().replace(',', ".");
        if !normalized.contains('.') {
            normalized.push_str(".0");
        }

        let invalid = || FormatError::Workload(raw.to_string());

        let (hours_part, fraction) = normalized.split_once('.').ok_or_else(invalid)?;
        if !is_signed_number(hours_part) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let hours: f64 = hours_part.parse().map_err(|_| invalid())?;
        let minutes: f64 = match fraction.len() {
            0 | 1 => format!("{fraction}0").parse().map_err(|_| invalid())?,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        let fraction = fraction.to_string();

        Ok(Self {
            normalized,
            hours,
            fraction,
            minutes,
        })
    }

    /// The workload read as a plain decimal number (`1.30` → `1.3`).
    pub fn value(&self) -> f64 {
        // Both halves were checked numeric, so this cannot fail.
        self.normalized.parse().unwrap_or(f64::NAN)
    }

    /// The minutes component after padding.
    pub fn minutes(&self) -> f64 {
        self.minutes
    }

    /// Number of digits submitted after the separator.
    pub fn fraction_len(&self) -> usize {
        self.fraction.len()
    }

    /// Total planned minutes: hours × 60 plus the literal minutes component.
    pub fn total_minutes(&self) -> f64 {
        self.hours * 60.0 + self.minutes
    }

}

fn is_signed_number(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
