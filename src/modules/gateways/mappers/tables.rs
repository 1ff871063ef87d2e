//! Per-bank vocabularies.
//!
//! Each mapper builds one `MappingTables` at construction and never mutates
//! it. Lookups of values a bank has no token for fail; nothing is passed
//! through raw.

use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::core::{Currency, PosError, Result};
use crate::modules::accounts::{Language, PaymentModel};
use crate::modules::cards::CardType;
use crate::modules::orders::{RecurringFrequency, TransactionType};

/// How a bank writes single-payment (0 or 1) installment counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallmentFormat {
    /// `''`
    EmptyForSingle,
    /// `'0'`
    ZeroForSingle,
}

impl InstallmentFormat {
    pub fn format(&self, installment: u32) -> String {
        match (installment, self) {
            (0 | 1, InstallmentFormat::EmptyForSingle) => String::new(),
            (0 | 1, InstallmentFormat::ZeroForSingle) => "0".to_string(),
            (n, _) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountFormat {
    /// Shortest decimal form: `100.25`, `10`, `10.5`
    Plain,
    /// Always two decimals: `10.10`
    TwoDecimals,
}

impl AmountFormat {
    pub fn format(&self, amount: Decimal) -> String {
        match self {
            AmountFormat::Plain => amount.normalize().to_string(),
            AmountFormat::TwoDecimals => {
                let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                rounded.rescale(2);
                rounded.to_string()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct MappingTables {
    tx_types: HashMap<TransactionType, &'static str>,
    secure_types: HashMap<PaymentModel, &'static str>,
    currencies: HashMap<Currency, &'static str>,
    card_types: HashMap<CardType, &'static str>,
    langs: HashMap<Language, &'static str>,
    recurring_frequencies: HashMap<RecurringFrequency, &'static str>,
    installment: InstallmentFormat,
    amount: AmountFormat,
}

impl MappingTables {
    /// Empty tables with ISO-4217 numeric currencies and `tr`/`en` languages
    pub fn new(installment: InstallmentFormat, amount: AmountFormat) -> Self {
        Self {
            tx_types: HashMap::new(),
            secure_types: HashMap::new(),
            currencies: Currency::ALL.iter().map(|c| (*c, c.iso_numeric())).collect(),
            card_types: HashMap::new(),
            langs: HashMap::from([(Language::Tr, "tr"), (Language::En, "en")]),
            recurring_frequencies: HashMap::new(),
            installment,
            amount,
        }
    }

    pub fn with_tx_types(mut self, pairs: impl IntoIterator<Item = (TransactionType, &'static str)>) -> Self {
        self.tx_types = pairs.into_iter().collect();
        self
    }

    pub fn with_secure_types(mut self, pairs: impl IntoIterator<Item = (PaymentModel, &'static str)>) -> Self {
        self.secure_types = pairs.into_iter().collect();
        self
    }

    pub fn with_card_types(mut self, pairs: impl IntoIterator<Item = (CardType, &'static str)>) -> Self {
        self.card_types = pairs.into_iter().collect();
        self
    }

    pub fn with_langs(mut self, pairs: impl IntoIterator<Item = (Language, &'static str)>) -> Self {
        self.langs = pairs.into_iter().collect();
        self
    }

    pub fn with_recurring_frequencies(
        mut self,
        pairs: impl IntoIterator<Item = (RecurringFrequency, &'static str)>,
    ) -> Self {
        self.recurring_frequencies = pairs.into_iter().collect();
        self
    }

    pub fn tx_type(&self, tx_type: TransactionType) -> Result<&'static str> {
        self.tx_types
            .get(&tx_type)
            .copied()
            .ok_or_else(|| PosError::unsupported_tx(format!("transaction type '{}' has no bank token", tx_type)))
    }

    pub fn secure_type(&self, model: PaymentModel) -> Result<&'static str> {
        self.secure_types
            .get(&model)
            .copied()
            .ok_or_else(|| PosError::unmapped("payment model", model))
    }

    pub fn currency(&self, currency: Currency) -> Result<&'static str> {
        self.currencies
            .get(&currency)
            .copied()
            .ok_or_else(|| PosError::unmapped("currency", currency))
    }

    pub fn card_type(&self, card_type: CardType) -> Result<&'static str> {
        self.card_types
            .get(&card_type)
            .copied()
            .ok_or_else(|| PosError::unmapped("card type", card_type))
    }

    pub fn lang(&self, lang: Language) -> Result<&'static str> {
        self.langs
            .get(&lang)
            .copied()
            .ok_or_else(|| PosError::unmapped("language", lang))
    }

    pub fn recurring_frequency(&self, frequency: RecurringFrequency) -> Result<&'static str> {
        self.recurring_frequencies
            .get(&frequency)
            .copied()
            .ok_or_else(|| PosError::unmapped("recurring frequency", frequency))
    }

    pub fn installment(&self, installment: u32) -> String {
        self.installment.format(installment)
    }

    pub fn amount(&self, amount: Decimal) -> String {
        self.amount.format(amount)
    }

    /// Reverse lookup of a bank transaction token
    pub fn tx_type_from_token(&self, token: &str) -> Option<TransactionType> {
        self.tx_types
            .iter()
            .find(|(_, t)| t.eq_ignore_ascii_case(token))
            .map(|(tx, _)| *tx)
    }

    pub fn currency_from_token(&self, token: &str) -> Option<Currency> {
        self.currencies
            .iter()
            .find(|(_, t)| **t == token)
            .map(|(c, _)| *c)
    }

    pub fn secure_type_from_token(&self, token: &str) -> Option<PaymentModel> {
        self.secure_types
            .iter()
            .find(|(_, t)| t.eq_ignore_ascii_case(token))
            .map(|(m, _)| *m)
    }
}
