use std::fmt;

use super::payment_model::{Language, PaymentModel};
use crate::core::{PosError, Result};

/// Bank credentials plus the payment model they were issued for.
///
/// Built once, then handed to the gateway for that bank. Fields are private
/// so an account cannot change underneath an in-flight transaction.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    bank: String,
    client_id: String,
    terminal_id: Option<String>,
    username: String,
    password: String,
    model: PaymentModel,
    lang: Language,
    store_key: Option<String>,
}

impl Account {
    /// Create an account
    ///
    /// # Arguments
    /// * `bank` - Registry id of the bank (e.g. `akbankv3`)
    /// * `client_id` - Merchant / client / shop code assigned by the bank
    /// * `username` - API user name
    /// * `password` - API password
    /// * `model` - Payment model the merchant is enrolled in
    pub fn new(
        bank: impl Into<String>,
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        model: PaymentModel,
    ) -> Self {
        Self {
            bank: bank.into(),
            client_id: client_id.into(),
            terminal_id: None,
            username: username.into(),
            password: password.into(),
            model,
            lang: Language::default(),
            store_key: None,
        }
    }

    /// Store key (a.k.a. merchant password) used for 3-D hashing
    pub fn with_store_key(mut self, store_key: impl Into<String>) -> Self {
        self.store_key = Some(store_key.into());
        self
    }

    pub fn with_terminal_id(mut self, terminal_id: impl Into<String>) -> Self {
        self.terminal_id = Some(terminal_id.into());
        self
    }

    pub fn with_lang(mut self, lang: Language) -> Self {
        self.lang = lang;
        self
    }

    pub fn bank(&self) -> &str {
        &self.bank
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn terminal_id(&self) -> Option<&str> {
        self.terminal_id.as_deref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn model(&self) -> PaymentModel {
        self.model
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    pub fn store_key(&self) -> Option<&str> {
        self.store_key.as_deref()
    }

    /// Store key, failing when the account was built without one
    pub fn require_store_key(&self) -> Result<&str> {
        self.store_key().ok_or_else(|| {
            PosError::configuration(format!("account for {} has no store key", self.bank))
        })
    }

    /// Terminal id, failing when the account was built without one
    pub fn require_terminal_id(&self) -> Result<&str> {
        self.terminal_id().ok_or_else(|| {
            PosError::configuration(format!("account for {} has no terminal id", self.bank))
        })
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("bank", &self.bank)
            .field("client_id", &self.client_id)
            .field("terminal_id", &self.terminal_id)
            .field("username", &self.username)
            .field("password", &"***")
            .field("model", &self.model)
            .field("lang", &self.lang)
            .field("store_key", &self.store_key.as_ref().map(|_| "***"))
            .finish()
    }
}
