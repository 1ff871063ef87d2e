use super::{ensure_payment_tx, form_card, lang_token, sign_form_inputs, RequestDataMapper};
use crate::core::{FieldMap, FieldMapExt, PosError, Result};
use crate::modules::accounts::{Account, Language, PaymentModel};
use crate::modules::cards::{CardType, CreditCard, ExpiryFormat};
use crate::modules::gateways::crypt::{Crypt, PayFlexCpV4PosCrypt};
use crate::modules::gateways::mappers::hooks::{HookContext, PreHashHooks};
use crate::modules::gateways::mappers::tables::{AmountFormat, InstallmentFormat, MappingTables};
use crate::modules::gateways::models::FormData;
use crate::modules::orders::{
    CancelOrder, PaymentOrder, PostAuthOrder, RecurringFrequency, RefundOrder, TransactionType,
};

/// Card present flag: `0` for e-commerce
const TRANSACTION_DEVICE_SOURCE: &str = "0";

/// PayFlex common payment v4 (Vakifbank) request mapper.
///
/// 3-D payments are not confirmed with a second charge request. The merchant
/// registers the transaction, redirects the customer with the returned
/// token, then queries the result once the bank posts back.
pub struct PayFlexCpV4PosRequestDataMapper {
    tables: MappingTables,
    crypt: PayFlexCpV4PosCrypt,
    hooks: PreHashHooks,
}

pub fn pay_flex_cp_v4_tables() -> MappingTables {
    MappingTables::new(InstallmentFormat::ZeroForSingle, AmountFormat::TwoDecimals)
        .with_tx_types([
            (TransactionType::PayAuth, "Sale"),
            (TransactionType::PayPreAuth, "Auth"),
            (TransactionType::PayPostAuth, "Capture"),
            (TransactionType::Cancel, "Cancel"),
            (TransactionType::Refund, "Refund"),
            (TransactionType::History, "TxnHistory"),
            (TransactionType::Status, "OrderInquiry"),
        ])
        .with_card_types([
            (CardType::Visa, "100"),
            (CardType::MasterCard, "200"),
            (CardType::Troy, "300"),
            (CardType::Amex, "400"),
        ])
        .with_langs([(Language::Tr, "tr-TR"), (Language::En, "en-US")])
        .with_recurring_frequencies([
            (RecurringFrequency::Day, "Day"),
            (RecurringFrequency::Month, "Month"),
            (RecurringFrequency::Year, "Year"),
        ])
}

impl PayFlexCpV4PosRequestDataMapper {
    pub fn new(hooks: PreHashHooks) -> Self {
        Self {
            tables: pay_flex_cp_v4_tables(),
            crypt: PayFlexCpV4PosCrypt,
            hooks,
        }
    }

    fn account_data(account: &Account) -> FieldMap {
        let mut data = FieldMap::new();
        data.insert("MerchantId".to_string(), account.client_id().to_string());
        data.insert("Password".to_string(), account.password().to_string());
        data
    }

    /// Registration (enrollment) request; the same call as `create_3d_form_data`
    /// under the name the bank uses for it
    pub fn create_3d_enrollment_request_data(
        &self,
        account: &Account,
        order: &PaymentOrder,
        model: PaymentModel,
        tx_type: TransactionType,
        card: Option<&CreditCard>,
    ) -> Result<FieldMap> {
        ensure_payment_tx(tx_type)?;

        let mut data = FieldMap::new();
        data.insert("HostMerchantId".to_string(), account.client_id().to_string());
        data.insert("MerchantPassword".to_string(), account.password().to_string());
        data.insert("HostTerminalId".to_string(), account.require_terminal_id()?.to_string());
        data.insert("TransactionType".to_string(), self.tables.tx_type(tx_type)?.to_string());
        data.insert("AmountCode".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert("Amount".to_string(), self.tables.amount(order.amount));
        data.insert("OrderID".to_string(), order.id.clone());
        data.insert("IsSecure".to_string(), "true".to_string());
        // Cards outside the 3-D programme are not passed through as half secure
        data.insert("AllowNotEnrolledCard".to_string(), "false".to_string());
        data.insert("SuccessUrl".to_string(), order.require_success_url()?.to_string());
        data.insert("FailUrl".to_string(), order.require_fail_url()?.to_string());
        data.insert(
            "RequestLanguage".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        data.insert("Extract".to_string(), String::new());
        data.insert("CustomItems".to_string(), String::new());

        if let Some(card) = form_card(model, card) {
            data.insert(
                "BrandNumber".to_string(),
                self.tables.card_type(card.require_type()?)?.to_string(),
            );
            data.insert("CVV".to_string(), card.cvv().to_string());
            data.insert("PAN".to_string(), card.number().to_string());
            data.insert("ExpireMonth".to_string(), card.expire_month());
            data.insert("ExpireYear".to_string(), card.expire_year_long());
            data.insert(
                "CardHoldersName".to_string(),
                card.holder_name().unwrap_or_default().to_string(),
            );
        }

        if order.installment > 0 {
            data.insert("InstallmentCount".to_string(), self.tables.installment(order.installment));
        }

        let ctx = HookContext {
            bank: account.bank(),
            tx_type,
            model,
        };
        sign_form_inputs(&self.crypt, &self.hooks, account, &ctx, data)
    }

    /// Query confirming the outcome reported by the bank's post-back
    pub fn create_3d_payment_status_request_data(
        &self,
        account: &Account,
        response_data: &FieldMap,
    ) -> Result<FieldMap> {
        let mut data = FieldMap::new();
        data.insert("HostMerchantId".to_string(), account.client_id().to_string());
        data.insert("Password".to_string(), account.password().to_string());
        data.insert(
            "TransactionId".to_string(),
            response_data.require("TransactionId")?.to_string(),
        );
        data.insert(
            "PaymentToken".to_string(),
            response_data.require("PaymentToken")?.to_string(),
        );
        Ok(data)
    }

    /// GET redirect to the common payment page, built from a registration response
    pub fn create_3d_redirect_form_data(&self, registration: &FieldMap) -> Result<FormData> {
        match (
            registration.value("CommonPaymentUrl"),
            registration.value("PaymentToken"),
        ) {
            (Some(url), Some(token)) => {
                let mut inputs = FieldMap::new();
                inputs.insert("Ptkn".to_string(), token.to_string());
                Ok(FormData::get(url, inputs))
            }
            _ => Err(PosError::gateway(format!(
                "registration failed: {} {}",
                registration.value("ErrorCode").unwrap_or("no error code"),
                registration.value_or_empty("ResponseMessage")
            ))),
        }
    }
}

impl RequestDataMapper for PayFlexCpV4PosRequestDataMapper {
    fn tables(&self) -> &MappingTables {
        &self.tables
    }

    fn crypt(&self) -> &dyn Crypt {
        &self.crypt
    }

    fn create_non_secure_payment_request_data(
        &self,
        account: &Account,
        order: &PaymentOrder,
        tx_type: TransactionType,
        card: &CreditCard,
    ) -> Result<FieldMap> {
        ensure_payment_tx(tx_type)?;

        let mut data = Self::account_data(account);
        data.insert("TransactionType".to_string(), self.tables.tx_type(tx_type)?.to_string());
        data.insert("OrderId".to_string(), order.id.clone());
        data.insert("CurrencyAmount".to_string(), self.tables.amount(order.amount));
        data.insert("CurrencyCode".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert("ClientIp".to_string(), order.ip.clone().unwrap_or_default());
        data.insert(
            "TransactionDeviceSource".to_string(),
            TRANSACTION_DEVICE_SOURCE.to_string(),
        );
        data.insert("Pan".to_string(), card.number().to_string());
        data.insert("Expiry".to_string(), card.expiration_date(ExpiryFormat::LongYearMonth));
        data.insert("Cvv".to_string(), card.cvv().to_string());
        Ok(data)
    }

    fn create_non_secure_post_auth_payment_request_data(
        &self,
        account: &Account,
        order: &PostAuthOrder,
    ) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert(
            "TransactionType".to_string(),
            self.tables.tx_type(TransactionType::PayPostAuth)?.to_string(),
        );
        data.insert("ReferenceTransactionId".to_string(), order.id.clone());
        data.insert("CurrencyAmount".to_string(), self.tables.amount(order.amount));
        data.insert("CurrencyCode".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert("ClientIp".to_string(), order.ip.clone().unwrap_or_default());
        Ok(data)
    }

    /// Registration request wrapped as a POST to the enrollment endpoint.
    /// The customer is redirected with [`Self::create_3d_redirect_form_data`]
    /// once the bank answers it.
    fn create_3d_form_data(
        &self,
        account: &Account,
        order: &PaymentOrder,
        model: PaymentModel,
        tx_type: TransactionType,
        gateway_url: &str,
        card: Option<&CreditCard>,
    ) -> Result<FormData> {
        let inputs = self.create_3d_enrollment_request_data(account, order, model, tx_type, card)?;
        Ok(FormData::post(gateway_url, inputs))
    }

    fn create_cancel_request_data(&self, account: &Account, order: &CancelOrder) -> Result<FieldMap> {
        let trans_id = order
            .trans_id
            .as_deref()
            .ok_or_else(|| PosError::missing_field("trans_id"))?;

        let mut data = Self::account_data(account);
        data.insert(
            "TransactionType".to_string(),
            self.tables.tx_type(TransactionType::Cancel)?.to_string(),
        );
        data.insert("ReferenceTransactionId".to_string(), trans_id.to_string());
        data.insert("ClientIp".to_string(), order.ip.clone().unwrap_or_default());
        Ok(data)
    }

    fn create_refund_request_data(&self, account: &Account, order: &RefundOrder) -> Result<FieldMap> {
        let trans_id = order
            .trans_id
            .as_deref()
            .ok_or_else(|| PosError::missing_field("trans_id"))?;

        let mut data = Self::account_data(account);
        data.insert(
            "TransactionType".to_string(),
            self.tables.tx_type(TransactionType::Refund)?.to_string(),
        );
        data.insert("ReferenceTransactionId".to_string(), trans_id.to_string());
        data.insert("ClientIp".to_string(), order.ip.clone().unwrap_or_default());
        data.insert("CurrencyAmount".to_string(), self.tables.amount(order.amount));
        Ok(data)
    }
}
