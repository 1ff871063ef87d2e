use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{PosError, Result};

/// Card brand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardType {
    Visa,
    MasterCard,
    Amex,
    Troy,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardType::Visa => write!(f, "VISA"),
            CardType::MasterCard => write!(f, "MASTERCARD"),
            CardType::Amex => write!(f, "AMEX"),
            CardType::Troy => write!(f, "TROY"),
        }
    }
}

/// Expiry layouts the banks ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryFormat {
    /// `MMYY`, e.g. `0125`
    MonthYear,
    /// `YYMM`, e.g. `2501`
    YearMonth,
    /// `YYYYMM`, e.g. `202501`
    LongYearMonth,
    /// `MM/YY`, e.g. `01/25`
    SlashedMonthYear,
}

/// Normalized card data.
///
/// Lives only for the duration of a request-building call. `Debug` masks the
/// PAN and hides the CVV.
#[derive(Clone, PartialEq, Eq)]
pub struct CreditCard {
    number: String,
    expire_year: u16,
    expire_month: u8,
    cvv: String,
    holder_name: Option<String>,
    card_type: Option<CardType>,
}

impl CreditCard {
    /// Create a card
    ///
    /// # Arguments
    /// * `number` - PAN; spaces and dashes are stripped
    /// * `expire_year` - two or four digit year
    /// * `expire_month` - month, 1-12
    /// * `cvv` - card verification value
    pub fn new(
        number: &str,
        expire_year: &str,
        expire_month: &str,
        cvv: &str,
    ) -> Result<Self> {
        let number: String = number
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if !(12..=19).contains(&number.len()) || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(PosError::validation("card number must be 12-19 digits"));
        }

        let year: u16 = expire_year
            .trim()
            .parse()
            .map_err(|_| PosError::validation(format!("invalid expiry year: {}", expire_year)))?;
        let expire_year = match year {
            0..=99 => 2000 + year,
            1000..=9999 => year,
            _ => return Err(PosError::validation(format!("invalid expiry year: {}", expire_year))),
        };

        let expire_month: u8 = expire_month
            .trim()
            .parse()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| {
                PosError::validation(format!("invalid expiry month: {}", expire_month))
            })?;

        if !cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(PosError::validation("cvv must be numeric"));
        }

        Ok(Self {
            number,
            expire_year,
            expire_month,
            cvv: cvv.to_string(),
            holder_name: None,
            card_type: None,
        })
    }

    pub fn with_holder_name(mut self, holder_name: impl Into<String>) -> Self {
        self.holder_name = Some(holder_name.into());
        self
    }

    pub fn with_type(mut self, card_type: CardType) -> Self {
        self.card_type = Some(card_type);
        self
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    pub fn holder_name(&self) -> Option<&str> {
        self.holder_name.as_deref()
    }

    pub fn card_type(&self) -> Option<CardType> {
        self.card_type
    }

    /// Card brand, failing when the card was built without one
    pub fn require_type(&self) -> Result<CardType> {
        self.card_type
            .ok_or_else(|| PosError::missing_field("card type"))
    }

    /// Zero padded month, `01`..`12`
    pub fn expire_month(&self) -> String {
        format!("{:02}", self.expire_month)
    }

    /// Two digit year
    pub fn expire_year_short(&self) -> String {
        format!("{:02}", self.expire_year % 100)
    }

    /// Four digit year
    pub fn expire_year_long(&self) -> String {
        format!("{:04}", self.expire_year)
    }

    pub fn expiration_date(&self, format: ExpiryFormat) -> String {
        match format {
            ExpiryFormat::MonthYear => {
                format!("{}{}", self.expire_month(), self.expire_year_short())
            }
            ExpiryFormat::YearMonth => {
                format!("{}{}", self.expire_year_short(), self.expire_month())
            }
            ExpiryFormat::LongYearMonth => {
                format!("{}{}", self.expire_year_long(), self.expire_month())
            }
            ExpiryFormat::SlashedMonthYear => {
                format!("{}/{}", self.expire_month(), self.expire_year_short())
            }
        }
    }

    /// PAN with everything but the first six and last four digits masked
    pub fn masked_number(&self) -> String {
        let len = self.number.len();
        self.number
            .chars()
            .enumerate()
            .map(|(i, c)| if i < 6 || i >= len - 4 { c } else { '*' })
            .collect()
    }
}

impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("number", &self.masked_number())
            .field("expire_year", &self.expire_year)
            .field("expire_month", &self.expire_month)
            .field("cvv", &"***")
            .field("card_type", &self.card_type)
            .finish()
    }
}
