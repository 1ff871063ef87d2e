use super::{ensure_payment_tx, form_card, lang_token, sign_form_inputs, RequestDataMapper};
use crate::core::{FieldMap, FieldMapExt, PosError, Result};
use crate::modules::accounts::{Account, PaymentModel};
use crate::modules::cards::{CardType, CreditCard, ExpiryFormat};
use crate::modules::gateways::crypt::{Crypt, EstPosCrypt, EstV3PosCrypt};
use crate::modules::gateways::mappers::hooks::{HookContext, PreHashHooks};
use crate::modules::gateways::mappers::tables::{AmountFormat, InstallmentFormat, MappingTables};
use crate::modules::gateways::models::FormData;
use crate::modules::orders::{
    CancelOrder, HistoryQuery, PaymentOrder, PostAuthOrder, RecurringFrequency, RecurringPlan,
    RefundOrder, StatusOrder, TransactionType,
};

/// Est 3-D form hashing generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstHashVersion {
    V1,
    V3,
}

/// Est family (Akbank, Isbank, Ziraat...) request mapper
pub struct EstPosRequestDataMapper {
    tables: MappingTables,
    crypt: Box<dyn Crypt>,
    hooks: PreHashHooks,
    version: EstHashVersion,
}

/// `Mode` of every API request; `T` would target the bank's test switch
const MODE: &str = "P";

pub fn est_tables() -> MappingTables {
    MappingTables::new(InstallmentFormat::EmptyForSingle, AmountFormat::Plain)
        .with_tx_types([
            (TransactionType::PayAuth, "Auth"),
            (TransactionType::PayPreAuth, "PreAuth"),
            (TransactionType::PayPostAuth, "PostAuth"),
            (TransactionType::Cancel, "Void"),
            (TransactionType::Refund, "Credit"),
            (TransactionType::Status, "ORDERSTATUS"),
            (TransactionType::History, "ORDERHISTORY"),
        ])
        .with_secure_types([
            (PaymentModel::NonSecure, "regular"),
            (PaymentModel::ThreeDSecure, "3d"),
            (PaymentModel::ThreeDPay, "3d_pay"),
            (PaymentModel::ThreeDHost, "3d_host"),
        ])
        .with_card_types([(CardType::Visa, "1"), (CardType::MasterCard, "2")])
        .with_recurring_frequencies([
            (RecurringFrequency::Day, "D"),
            (RecurringFrequency::Week, "W"),
            (RecurringFrequency::Month, "M"),
            (RecurringFrequency::Year, "Y"),
        ])
}

impl EstPosRequestDataMapper {
    /// SHA-1 hashed forms (`islemtipi`)
    pub fn new(hooks: PreHashHooks) -> Self {
        Self {
            tables: est_tables(),
            crypt: Box::new(EstPosCrypt),
            hooks,
            version: EstHashVersion::V1,
        }
    }

    /// `ver3` hashed forms (`TranType`, SHA-512 over every input)
    pub fn v3(hooks: PreHashHooks) -> Self {
        Self {
            tables: est_tables(),
            crypt: Box::new(EstV3PosCrypt),
            hooks,
            version: EstHashVersion::V3,
        }
    }

    pub fn version(&self) -> EstHashVersion {
        self.version
    }

    fn account_data(account: &Account) -> FieldMap {
        let mut data = FieldMap::new();
        data.insert("Name".to_string(), account.username().to_string());
        data.insert("Password".to_string(), account.password().to_string());
        data.insert("ClientId".to_string(), account.client_id().to_string());
        data
    }

    fn payment_data(&self, account: &Account, order: &PaymentOrder, tx_type: TransactionType) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert("Type".to_string(), self.tables.tx_type(tx_type)?.to_string());
        data.insert("IPAddress".to_string(), order.ip.clone().unwrap_or_default());
        data.insert("Email".to_string(), order.email.clone().unwrap_or_default());
        data.insert("OrderId".to_string(), order.id.clone());
        data.insert("Total".to_string(), self.tables.amount(order.amount));
        data.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert("Taksit".to_string(), self.tables.installment(order.installment));
        Ok(data)
    }

    fn recurring_data(&self, data: &mut FieldMap, plan: &RecurringPlan) -> Result<()> {
        data.insert("PbOrder.OrderType".to_string(), "0".to_string());
        data.insert(
            "PbOrder.OrderFrequencyInterval".to_string(),
            plan.frequency.to_string(),
        );
        data.insert(
            "PbOrder.OrderFrequencyCycle".to_string(),
            self.tables.recurring_frequency(plan.frequency_type)?.to_string(),
        );
        data.insert(
            "PbOrder.TotalNumberPayments".to_string(),
            plan.installment_count.to_string(),
        );
        Ok(())
    }
}

impl RequestDataMapper for EstPosRequestDataMapper {
    fn tables(&self) -> &MappingTables {
        &self.tables
    }

    fn crypt(&self) -> &dyn Crypt {
        self.crypt.as_ref()
    }

    fn create_non_secure_payment_request_data(
        &self,
        account: &Account,
        order: &PaymentOrder,
        tx_type: TransactionType,
        card: &CreditCard,
    ) -> Result<FieldMap> {
        ensure_payment_tx(tx_type)?;

        let mut data = self.payment_data(account, order, tx_type)?;
        data.insert("Number".to_string(), card.number().to_string());
        data.insert(
            "Expires".to_string(),
            card.expiration_date(ExpiryFormat::SlashedMonthYear),
        );
        data.insert("Cvv2Val".to_string(), card.cvv().to_string());
        data.insert("Mode".to_string(), MODE.to_string());
        data.insert(
            "BillTo.Name".to_string(),
            card.holder_name().unwrap_or_default().to_string(),
        );
        if let Some(plan) = &order.recurring {
            self.recurring_data(&mut data, plan)?;
        }
        Ok(data)
    }

    fn create_non_secure_post_auth_payment_request_data(
        &self,
        account: &Account,
        order: &PostAuthOrder,
    ) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert(
            "Type".to_string(),
            self.tables.tx_type(TransactionType::PayPostAuth)?.to_string(),
        );
        data.insert("OrderId".to_string(), order.id.clone());
        data.insert("Total".to_string(), self.tables.amount(order.amount));
        data.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert("Mode".to_string(), MODE.to_string());
        Ok(data)
    }

    fn create_3d_payment_request_data(
        &self,
        account: &Account,
        order: &PaymentOrder,
        tx_type: TransactionType,
        response_data: &FieldMap,
    ) -> Result<FieldMap> {
        ensure_payment_tx(tx_type)?;

        let mut data = self.payment_data(account, order, tx_type)?;
        data.insert("Number".to_string(), response_data.require("md")?.to_string());
        data.insert("PayerTxnId".to_string(), response_data.value_or_empty("xid").to_string());
        data.insert(
            "PayerSecurityLevel".to_string(),
            response_data.value_or_empty("eci").to_string(),
        );
        data.insert(
            "PayerAuthenticationCode".to_string(),
            response_data.value_or_empty("cavv").to_string(),
        );
        data.insert("Mode".to_string(), MODE.to_string());
        if let Some(plan) = &order.recurring {
            self.recurring_data(&mut data, plan)?;
        }
        Ok(data)
    }

    fn create_3d_form_data(
        &self,
        account: &Account,
        order: &PaymentOrder,
        model: PaymentModel,
        tx_type: TransactionType,
        gateway_url: &str,
        card: Option<&CreditCard>,
    ) -> Result<FormData> {
        ensure_payment_tx(tx_type)?;
        let success_url = order.require_success_url()?;
        let fail_url = order.require_fail_url()?;

        let mut inputs = FieldMap::new();
        inputs.insert("clientid".to_string(), account.client_id().to_string());
        inputs.insert("storetype".to_string(), self.tables.secure_type(model)?.to_string());
        inputs.insert("amount".to_string(), self.tables.amount(order.amount));
        inputs.insert("oid".to_string(), order.id.clone());
        inputs.insert("okUrl".to_string(), success_url.to_string());
        inputs.insert("failUrl".to_string(), fail_url.to_string());
        inputs.insert("rnd".to_string(), self.crypt.generate_random_string());
        inputs.insert(
            "lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        inputs.insert("currency".to_string(), self.tables.currency(order.currency)?.to_string());
        inputs.insert("taksit".to_string(), self.tables.installment(order.installment));

        let tx_token = self.tables.tx_type(tx_type)?.to_string();
        match self.version {
            EstHashVersion::V1 => {
                inputs.insert("islemtipi".to_string(), tx_token);
            }
            EstHashVersion::V3 => {
                inputs.insert("TranType".to_string(), tx_token);
                inputs.insert("hashAlgorithm".to_string(), "ver3".to_string());
                inputs.insert("callbackUrl".to_string(), fail_url.to_string());
            }
        }

        if let Some(card) = form_card(model, card) {
            if let Some(card_type) = card.card_type() {
                inputs.insert("cardType".to_string(), self.tables.card_type(card_type)?.to_string());
            }
            inputs.insert("pan".to_string(), card.number().to_string());
            inputs.insert("Ecom_Payment_Card_ExpDate_Month".to_string(), card.expire_month());
            inputs.insert("Ecom_Payment_Card_ExpDate_Year".to_string(), card.expire_year_short());
            inputs.insert("cv2".to_string(), card.cvv().to_string());
        }

        let ctx = HookContext {
            bank: account.bank(),
            tx_type,
            model,
        };
        let inputs = sign_form_inputs(self.crypt.as_ref(), &self.hooks, account, &ctx, inputs)?;
        Ok(FormData::post(gateway_url, inputs))
    }

    fn create_status_request_data(&self, account: &Account, order: &StatusOrder) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert("OrderId".to_string(), order.id.clone());
        data.insert("Extra.ORDERSTATUS".to_string(), "QUERY".to_string());
        Ok(data)
    }

    fn create_cancel_request_data(&self, account: &Account, order: &CancelOrder) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert("OrderId".to_string(), order.id.clone());
        data.insert(
            "Type".to_string(),
            self.tables.tx_type(TransactionType::Cancel)?.to_string(),
        );
        Ok(data)
    }

    fn create_refund_request_data(&self, account: &Account, order: &RefundOrder) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert("OrderId".to_string(), order.id.clone());
        data.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert(
            "Type".to_string(),
            self.tables.tx_type(TransactionType::Refund)?.to_string(),
        );
        data.insert("Total".to_string(), self.tables.amount(order.amount));
        Ok(data)
    }

    /// Est lists history per order only
    fn create_history_request_data(&self, account: &Account, query: &HistoryQuery) -> Result<FieldMap> {
        query.validate()?;
        let order_id = query
            .order_id
            .as_deref()
            .ok_or_else(|| PosError::missing_field("order id"))?;

        let mut data = Self::account_data(account);
        data.insert("OrderId".to_string(), order_id.to_string());
        data.insert("Extra.ORDERHISTORY".to_string(), "QUERY".to_string());
        Ok(data)
    }
}
