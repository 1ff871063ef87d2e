use super::{ensure_payment_tx, form_card, lang_token, sign_form_inputs, RequestDataMapper};
use crate::core::{FieldMap, FieldMapExt, Result};
use crate::modules::accounts::{Account, Language, PaymentModel};
use crate::modules::cards::{CreditCard, ExpiryFormat};
use crate::modules::gateways::crypt::{Crypt, PayForPosCrypt};
use crate::modules::gateways::mappers::hooks::{HookContext, PreHashHooks};
use crate::modules::gateways::mappers::tables::{AmountFormat, InstallmentFormat, MappingTables};
use crate::modules::gateways::models::FormData;
use crate::modules::orders::{
    CancelOrder, HistoryQuery, PaymentOrder, PostAuthOrder, RefundOrder, StatusOrder,
    TransactionType,
};

/// Member id QNB Finansbank assigns to every merchant
const MBR_ID: &str = "5";
const MOTO: &str = "0";

const SECURE_TYPE_3D_PAYMENT: &str = "3DModelPayment";
const SECURE_TYPE_INQUIRY: &str = "Inquiry";
const SECURE_TYPE_REPORT: &str = "Report";

/// PayFor (QNB Finansbank) request mapper
pub struct PayForPosRequestDataMapper {
    tables: MappingTables,
    crypt: PayForPosCrypt,
    hooks: PreHashHooks,
}

pub fn pay_for_tables() -> MappingTables {
    MappingTables::new(InstallmentFormat::ZeroForSingle, AmountFormat::Plain)
        .with_tx_types([
            (TransactionType::PayAuth, "Auth"),
            (TransactionType::PayPreAuth, "PreAuth"),
            (TransactionType::PayPostAuth, "PostAuth"),
            (TransactionType::Cancel, "Void"),
            (TransactionType::Refund, "Refund"),
            (TransactionType::Status, "OrderInquiry"),
            (TransactionType::History, "TxnHistory"),
        ])
        .with_secure_types([
            (PaymentModel::ThreeDSecure, "3DModel"),
            (PaymentModel::ThreeDPay, "3DPay"),
            (PaymentModel::ThreeDHost, "3DHost"),
            (PaymentModel::NonSecure, "NonSecure"),
        ])
        .with_langs([(Language::Tr, "TR"), (Language::En, "EN")])
}

impl PayForPosRequestDataMapper {
    pub fn new(hooks: PreHashHooks) -> Self {
        Self {
            tables: pay_for_tables(),
            crypt: PayForPosCrypt,
            hooks,
        }
    }

    fn account_data(account: &Account) -> FieldMap {
        let mut data = FieldMap::new();
        data.insert("MbrId".to_string(), MBR_ID.to_string());
        data.insert("MerchantId".to_string(), account.client_id().to_string());
        data.insert("UserCode".to_string(), account.username().to_string());
        data.insert("UserPass".to_string(), account.password().to_string());
        data
    }

    fn non_secure_type(&self) -> Result<String> {
        Ok(self.tables.secure_type(PaymentModel::NonSecure)?.to_string())
    }

    fn insert_card(data: &mut FieldMap, card: &CreditCard) {
        data.insert(
            "CardHolderName".to_string(),
            card.holder_name().unwrap_or_default().to_string(),
        );
        data.insert("Pan".to_string(), card.number().to_string());
        data.insert("Expiry".to_string(), card.expiration_date(ExpiryFormat::MonthYear));
        data.insert("Cvv2".to_string(), card.cvv().to_string());
    }
}

impl RequestDataMapper for PayForPosRequestDataMapper {
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
        data.insert("MOTO".to_string(), MOTO.to_string());
        data.insert("OrderId".to_string(), order.id.clone());
        data.insert("SecureType".to_string(), self.non_secure_type()?);
        data.insert("TxnType".to_string(), self.tables.tx_type(tx_type)?.to_string());
        data.insert("PurchAmount".to_string(), self.tables.amount(order.amount));
        data.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert("InstallmentCount".to_string(), self.tables.installment(order.installment));
        data.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        Self::insert_card(&mut data, card);
        Ok(data)
    }

    fn create_non_secure_post_auth_payment_request_data(
        &self,
        account: &Account,
        order: &PostAuthOrder,
    ) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert("OrgOrderId".to_string(), order.id.clone());
        data.insert("SecureType".to_string(), self.non_secure_type()?);
        data.insert(
            "TxnType".to_string(),
            self.tables.tx_type(TransactionType::PayPostAuth)?.to_string(),
        );
        data.insert("PurchAmount".to_string(), self.tables.amount(order.amount));
        data.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert("Lang".to_string(), self.tables.lang(account.lang())?.to_string());
        Ok(data)
    }

    /// The bank already holds the order; only the authentication GUID is echoed
    fn create_3d_payment_request_data(
        &self,
        account: &Account,
        order: &PaymentOrder,
        tx_type: TransactionType,
        response_data: &FieldMap,
    ) -> Result<FieldMap> {
        ensure_payment_tx(tx_type)?;

        let mut data = FieldMap::new();
        data.insert(
            "RequestGuid".to_string(),
            response_data.require("RequestGuid")?.to_string(),
        );
        data.insert("UserCode".to_string(), account.username().to_string());
        data.insert("UserPass".to_string(), account.password().to_string());
        data.insert("OrderId".to_string(), order.id.clone());
        data.insert("SecureType".to_string(), SECURE_TYPE_3D_PAYMENT.to_string());
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

        let mut inputs = FieldMap::new();
        inputs.insert("MbrId".to_string(), MBR_ID.to_string());
        inputs.insert("MerchantID".to_string(), account.client_id().to_string());
        inputs.insert("UserCode".to_string(), account.username().to_string());
        inputs.insert("OrderId".to_string(), order.id.clone());
        inputs.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        inputs.insert("SecureType".to_string(), self.tables.secure_type(model)?.to_string());
        inputs.insert("TxnType".to_string(), self.tables.tx_type(tx_type)?.to_string());
        inputs.insert("PurchAmount".to_string(), self.tables.amount(order.amount));
        inputs.insert("InstallmentCount".to_string(), self.tables.installment(order.installment));
        inputs.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        inputs.insert("OkUrl".to_string(), order.require_success_url()?.to_string());
        inputs.insert("FailUrl".to_string(), order.require_fail_url()?.to_string());
        inputs.insert("Rnd".to_string(), self.crypt.generate_random_string());

        if let Some(card) = form_card(model, card) {
            Self::insert_card(&mut inputs, card);
        }

        let ctx = HookContext {
            bank: account.bank(),
            tx_type,
            model,
        };
        let inputs = sign_form_inputs(&self.crypt, &self.hooks, account, &ctx, inputs)?;
        Ok(FormData::post(gateway_url, inputs))
    }

    fn create_status_request_data(&self, account: &Account, order: &StatusOrder) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert("OrgOrderId".to_string(), order.id.clone());
        data.insert("SecureType".to_string(), SECURE_TYPE_INQUIRY.to_string());
        data.insert(
            "TxnType".to_string(),
            self.tables.tx_type(TransactionType::Status)?.to_string(),
        );
        data.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        Ok(data)
    }

    fn create_cancel_request_data(&self, account: &Account, order: &CancelOrder) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert("OrgOrderId".to_string(), order.id.clone());
        data.insert("SecureType".to_string(), self.non_secure_type()?);
        data.insert(
            "TxnType".to_string(),
            self.tables.tx_type(TransactionType::Cancel)?.to_string(),
        );
        data.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        Ok(data)
    }

    fn create_refund_request_data(&self, account: &Account, order: &RefundOrder) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert("OrgOrderId".to_string(), order.id.clone());
        data.insert("SecureType".to_string(), self.non_secure_type()?);
        data.insert(
            "TxnType".to_string(),
            self.tables.tx_type(TransactionType::Refund)?.to_string(),
        );
        data.insert("PurchAmount".to_string(), self.tables.amount(order.amount));
        data.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        Ok(data)
    }

    fn create_history_request_data(&self, account: &Account, query: &HistoryQuery) -> Result<FieldMap> {
        query.validate()?;

        let mut data = Self::account_data(account);
        data.insert("SecureType".to_string(), SECURE_TYPE_REPORT.to_string());
        data.insert(
            "TxnType".to_string(),
            self.tables.tx_type(TransactionType::History)?.to_string(),
        );
        data.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, query.lang)?.to_string(),
        );
        match (&query.order_id, query.date) {
            (Some(order_id), _) => {
                data.insert("OrgOrderId".to_string(), order_id.clone());
            }
            (None, Some(date)) => {
                data.insert("ReqDate".to_string(), date.format("%Y%m%d").to_string());
            }
            (None, None) => {}
        }
        Ok(data)
    }
}
