use std::fmt;

/// Money is represented as integer paise to avoid floating-point precision issues.
/// 1 rupee = 100 paise, so ₹24.00 = 2400 paise.
pub type Paise = i64;

pub const PAISE_PER_RUPEE: Paise = 100;

/// Convert a whole number of rupees into paise.
pub fn rupees(units: i64) -> Paise {
    units * PAISE_PER_RUPEE
}

/// Half of an amount, used for the company share of an application fee.
/// Prices are whole rupees, so the result is exact in paise.
pub fn half(amount: Paise) -> Paise {
    amount / 2
}

/// Format paise as a human-readable rupee string.
/// Example: 2400 -> "24.00", 1250 -> "12.50"
pub fn format_rupees(paise: Paise) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.abs();
    format!(
        "{}{}.{:02}",
        sign,
        abs / PAISE_PER_RUPEE,
        abs % PAISE_PER_RUPEE
    )
}

/// Parse a decimal rupee string into paise.
/// Example: "24.00" -> 2400, "12.5" -> 1250, "100" -> 10000
pub fn parse_rupees(input: &str) -> Result<Paise, ParseRupeesError> {
    let input = input.trim();
    let negative = input.starts_with('-');
    let input = input.trim_start_matches('-');

    let (units, fraction) = match input.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (input, ""),
    };
    if !fraction.chars().all(|c| c.is_ascii_digit()) || (units.is_empty() && fraction.is_empty())
    {
        return Err(ParseRupeesError::InvalidFormat);
    }

    let units: i64 = if units.is_empty() {
        0
    } else {
        units.parse().map_err(|_| ParseRupeesError::InvalidFormat)?
    };

    // Pad a single digit ("5" -> 50 paise), truncate anything past two digits
    let fraction_paise: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| ParseRupeesError::InvalidFormat)? * 10,
        _ => fraction[..2]
            .parse()
            .map_err(|_| ParseRupeesError::InvalidFormat)?,
    };

    let paise = units
        .checked_mul(PAISE_PER_RUPEE)
        .and_then(|p| p.checked_add(fraction_paise))
        .ok_or(ParseRupeesError::Overflow)?;
    Ok(if negative { -paise } else { paise })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseRupeesError {
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseRupeesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseRupeesError::InvalidFormat => write!(f, "invalid money format"),
            ParseRupeesError::Overflow => write!(f, "amount too large"),
        }
    }
}

impl std::error::Error for ParseRupeesError {}
