use super::{ensure_payment_tx, form_card, lang_token, sign_form_inputs, RequestDataMapper};
use crate::core::{FieldMap, FieldMapExt, Result};
use crate::modules::accounts::{Account, PaymentModel};
use crate::modules::cards::{CardType, CreditCard, ExpiryFormat};
use crate::modules::gateways::crypt::{Crypt, InterPosCrypt};
use crate::modules::gateways::mappers::hooks::{HookContext, PreHashHooks};
use crate::modules::gateways::mappers::tables::{AmountFormat, InstallmentFormat, MappingTables};
use crate::modules::gateways::models::FormData;
use crate::modules::orders::{
    CancelOrder, PaymentOrder, PostAuthOrder, RefundOrder, StatusOrder, TransactionType,
};

/// Mail/telephone order flag; always an e-commerce transaction here
const MOTO: &str = "0";

/// InterPos (Denizbank) request mapper.
///
/// Follow-up operations reference the original order through `orgOrderId`
/// and send no `OrderId` of their own. History is not offered.
pub struct InterPosRequestDataMapper {
    tables: MappingTables,
    crypt: InterPosCrypt,
    hooks: PreHashHooks,
}

pub fn inter_pos_tables() -> MappingTables {
    MappingTables::new(InstallmentFormat::EmptyForSingle, AmountFormat::Plain)
        .with_tx_types([
            (TransactionType::PayAuth, "Auth"),
            (TransactionType::PayPreAuth, "PreAuth"),
            (TransactionType::PayPostAuth, "PostAuth"),
            (TransactionType::Cancel, "Void"),
            (TransactionType::Refund, "Refund"),
            (TransactionType::Status, "StatusHistory"),
        ])
        .with_secure_types([
            (PaymentModel::ThreeDSecure, "3DModel"),
            (PaymentModel::ThreeDPay, "3DPay"),
            (PaymentModel::ThreeDHost, "3DHost"),
            (PaymentModel::NonSecure, "NonSecure"),
        ])
        .with_card_types([
            (CardType::Visa, "0"),
            (CardType::MasterCard, "1"),
            (CardType::Amex, "2"),
            (CardType::Troy, "3"),
        ])
}

impl InterPosRequestDataMapper {
    pub fn new(hooks: PreHashHooks) -> Self {
        Self {
            tables: inter_pos_tables(),
            crypt: InterPosCrypt,
            hooks,
        }
    }

    fn account_data(account: &Account) -> FieldMap {
        let mut data = FieldMap::new();
        data.insert("UserCode".to_string(), account.username().to_string());
        data.insert("UserPass".to_string(), account.password().to_string());
        data.insert("ShopCode".to_string(), account.client_id().to_string());
        data
    }

    fn non_secure_type(&self) -> Result<String> {
        Ok(self.tables.secure_type(PaymentModel::NonSecure)?.to_string())
    }

    fn insert_card(&self, data: &mut FieldMap, card: &CreditCard) -> Result<()> {
        data.insert(
            "CardType".to_string(),
            self.tables.card_type(card.require_type()?)?.to_string(),
        );
        data.insert("Pan".to_string(), card.number().to_string());
        data.insert("Expiry".to_string(), card.expiration_date(ExpiryFormat::MonthYear));
        data.insert("Cvv2".to_string(), card.cvv().to_string());
        Ok(())
    }
}

impl RequestDataMapper for InterPosRequestDataMapper {
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
        data.insert("TxnType".to_string(), self.tables.tx_type(tx_type)?.to_string());
        data.insert("SecureType".to_string(), self.non_secure_type()?);
        data.insert("OrderId".to_string(), order.id.clone());
        data.insert("PurchAmount".to_string(), self.tables.amount(order.amount));
        data.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert("InstallmentCount".to_string(), self.tables.installment(order.installment));
        data.insert("MOTO".to_string(), MOTO.to_string());
        data.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        self.insert_card(&mut data, card)?;
        Ok(data)
    }

    fn create_non_secure_post_auth_payment_request_data(
        &self,
        account: &Account,
        order: &PostAuthOrder,
    ) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert(
            "TxnType".to_string(),
            self.tables.tx_type(TransactionType::PayPostAuth)?.to_string(),
        );
        data.insert("SecureType".to_string(), self.non_secure_type()?);
        data.insert("orgOrderId".to_string(), order.id.clone());
        data.insert("PurchAmount".to_string(), self.tables.amount(order.amount));
        data.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert("MOTO".to_string(), MOTO.to_string());
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

        let mut data = Self::account_data(account);
        data.insert("TxnType".to_string(), self.tables.tx_type(tx_type)?.to_string());
        data.insert("SecureType".to_string(), self.non_secure_type()?);
        data.insert("OrderId".to_string(), order.id.clone());
        data.insert("PurchAmount".to_string(), self.tables.amount(order.amount));
        data.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        data.insert("InstallmentCount".to_string(), self.tables.installment(order.installment));
        data.insert("MD".to_string(), response_data.require("MD")?.to_string());
        data.insert(
            "PayerTxnId".to_string(),
            response_data.value_or_empty("PayerTxnId").to_string(),
        );
        data.insert("Eci".to_string(), response_data.value_or_empty("Eci").to_string());
        data.insert(
            "PayerAuthenticationCode".to_string(),
            response_data.value_or_empty("PayerAuthenticationCode").to_string(),
        );
        data.insert("MOTO".to_string(), MOTO.to_string());
        data.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
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
        inputs.insert("ShopCode".to_string(), account.client_id().to_string());
        inputs.insert("TxnType".to_string(), self.tables.tx_type(tx_type)?.to_string());
        inputs.insert("SecureType".to_string(), self.tables.secure_type(model)?.to_string());
        inputs.insert("PurchAmount".to_string(), self.tables.amount(order.amount));
        inputs.insert("OrderId".to_string(), order.id.clone());
        inputs.insert("OkUrl".to_string(), order.require_success_url()?.to_string());
        inputs.insert("FailUrl".to_string(), order.require_fail_url()?.to_string());
        inputs.insert("Rnd".to_string(), self.crypt.generate_random_string());
        inputs.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        inputs.insert("Currency".to_string(), self.tables.currency(order.currency)?.to_string());
        inputs.insert("InstallmentCount".to_string(), self.tables.installment(order.installment));

        if let Some(card) = form_card(model, card) {
            self.insert_card(&mut inputs, card)?;
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
        data.insert("orgOrderId".to_string(), order.id.clone());
        data.insert(
            "TxnType".to_string(),
            self.tables.tx_type(TransactionType::Status)?.to_string(),
        );
        data.insert("SecureType".to_string(), self.non_secure_type()?);
        data.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        Ok(data)
    }

    fn create_cancel_request_data(&self, account: &Account, order: &CancelOrder) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert("orgOrderId".to_string(), order.id.clone());
        data.insert(
            "TxnType".to_string(),
            self.tables.tx_type(TransactionType::Cancel)?.to_string(),
        );
        data.insert("SecureType".to_string(), self.non_secure_type()?);
        data.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        Ok(data)
    }

    fn create_refund_request_data(&self, account: &Account, order: &RefundOrder) -> Result<FieldMap> {
        let mut data = Self::account_data(account);
        data.insert("orgOrderId".to_string(), order.id.clone());
        data.insert("PurchAmount".to_string(), self.tables.amount(order.amount));
        data.insert(
            "TxnType".to_string(),
            self.tables.tx_type(TransactionType::Refund)?.to_string(),
        );
        data.insert("SecureType".to_string(), self.non_secure_type()?);
        data.insert(
            "Lang".to_string(),
            lang_token(&self.tables, account, order.lang)?.to_string(),
        );
        data.insert("MOTO".to_string(), MOTO.to_string());
        Ok(data)
    }
}
