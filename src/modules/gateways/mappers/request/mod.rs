//! Canonical orders to bank field maps.
//!
//! One mapper per bank family. Every operation takes the narrow order
//! projection it needs; operations a bank does not offer fail with
//! `NotImplemented`, unsupported sub-types of an offered operation with
//! `UnsupportedTransactionType`.

pub mod est_pos;
pub mod inter_pos;
pub mod pay_flex_cp_v4_pos;
pub mod pay_for_pos;

use crate::core::{FieldMap, PosError, Result};
use crate::modules::accounts::{Account, Language, PaymentModel};
use crate::modules::cards::CreditCard;
use crate::modules::gateways::crypt::Crypt;
use crate::modules::gateways::mappers::hooks::{HookContext, PreHashHooks};
use crate::modules::gateways::mappers::tables::MappingTables;
use crate::modules::gateways::models::FormData;
use crate::modules::orders::{
    CancelOrder, HistoryQuery, PaymentOrder, PostAuthOrder, RefundOrder, StatusOrder,
    TransactionType,
};

pub use est_pos::EstPosRequestDataMapper;
pub use inter_pos::InterPosRequestDataMapper;
pub use pay_flex_cp_v4_pos::PayFlexCpV4PosRequestDataMapper;
pub use pay_for_pos::PayForPosRequestDataMapper;

pub trait RequestDataMapper: Send + Sync {
    fn tables(&self) -> &MappingTables;

    fn crypt(&self) -> &dyn Crypt;

    /// Direct charge with card data
    fn create_non_secure_payment_request_data(
        &self,
        _account: &Account,
        _order: &PaymentOrder,
        _tx_type: TransactionType,
        _card: &CreditCard,
    ) -> Result<FieldMap> {
        Err(PosError::not_implemented("non-secure payment"))
    }

    fn create_non_secure_post_auth_payment_request_data(
        &self,
        _account: &Account,
        _order: &PostAuthOrder,
    ) -> Result<FieldMap> {
        Err(PosError::not_implemented("post-auth"))
    }

    /// Confirmation request sent after a verified 3-D post-back
    fn create_3d_payment_request_data(
        &self,
        _account: &Account,
        _order: &PaymentOrder,
        _tx_type: TransactionType,
        _response_data: &FieldMap,
    ) -> Result<FieldMap> {
        Err(PosError::not_implemented("3-D payment confirmation"))
    }

    /// Redirect form for 3-D authentication. The hash is computed last,
    /// after the pre-hash hooks.
    fn create_3d_form_data(
        &self,
        account: &Account,
        order: &PaymentOrder,
        model: PaymentModel,
        tx_type: TransactionType,
        gateway_url: &str,
        card: Option<&CreditCard>,
    ) -> Result<FormData>;

    fn create_status_request_data(&self, _account: &Account, _order: &StatusOrder) -> Result<FieldMap> {
        Err(PosError::not_implemented("status"))
    }

    fn create_cancel_request_data(&self, _account: &Account, _order: &CancelOrder) -> Result<FieldMap> {
        Err(PosError::not_implemented("cancel"))
    }

    fn create_refund_request_data(&self, _account: &Account, _order: &RefundOrder) -> Result<FieldMap> {
        Err(PosError::not_implemented("refund"))
    }

    fn create_history_request_data(&self, _account: &Account, _query: &HistoryQuery) -> Result<FieldMap> {
        Err(PosError::not_implemented("history"))
    }
}

/// Only auth and pre-auth start a payment
pub(crate) fn ensure_payment_tx(tx_type: TransactionType) -> Result<()> {
    match tx_type {
        TransactionType::PayAuth | TransactionType::PayPreAuth => Ok(()),
        other => Err(PosError::unsupported_tx(format!(
            "'{}' cannot start a payment",
            other
        ))),
    }
}

/// Order language wins over the account default
pub(crate) fn lang_token(
    tables: &MappingTables,
    account: &Account,
    order_lang: Option<Language>,
) -> Result<&'static str> {
    tables.lang(order_lang.unwrap_or_else(|| account.lang()))
}

/// Card fields never go into 3D_HOST forms; the bank collects them itself
pub(crate) fn form_card(model: PaymentModel, card: Option<&CreditCard>) -> Option<&CreditCard> {
    match model {
        PaymentModel::ThreeDHost => None,
        _ => card,
    }
}

/// Runs the hooks, then attaches the hash computed over their output
pub(crate) fn sign_form_inputs(
    crypt: &dyn Crypt,
    hooks: &PreHashHooks,
    account: &Account,
    ctx: &HookContext<'_>,
    inputs: FieldMap,
) -> Result<FieldMap> {
    let mut inputs = hooks.apply(ctx, inputs);
    inputs.shift_remove(crypt.hash_field());
    let hash = crypt.create_3d_hash(account, &inputs)?;
    inputs.insert(crypt.hash_field().to_string(), hash);
    Ok(inputs)
}
