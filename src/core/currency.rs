use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies accepted by the supported bank families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Turkish Lira
    TRY,
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound
    GBP,
    /// Japanese Yen
    JPY,
    /// Russian Ruble
    RUB,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::TRY,
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::RUB,
    ];

    /// ISO-4217 numeric code
    pub fn iso_numeric(&self) -> &'static str {
        match self {
            Currency::TRY => "949",
            Currency::USD => "840",
            Currency::EUR => "978",
            Currency::GBP => "826",
            Currency::JPY => "392",
            Currency::RUB => "643",
        }
    }

    /// Reverse lookup of an ISO-4217 numeric code
    pub fn from_iso_numeric(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.iso_numeric() == code)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::TRY
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::TRY => write!(f, "TRY"),
            Currency::USD => write!(f, "USD"),
            Currency::EUR => write!(f, "EUR"),
            Currency::GBP => write!(f, "GBP"),
            Currency::JPY => write!(f, "JPY"),
            Currency::RUB => write!(f, "RUB"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRY" => Ok(Currency::TRY),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "RUB" => Ok(Currency::RUB),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}

impl TryFrom<&str> for Currency {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
