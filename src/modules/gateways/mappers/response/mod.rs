//! Bank answers to canonical [`Response`]s.
//!
//! Approval and 3-D authentication rules live here and nowhere else; the
//! gateways only ask `is_3d_auth_success` and forward decoded payloads.

pub mod est_pos;
pub mod inter_pos;
pub mod pay_flex_cp_v4_pos;
pub mod pay_for_pos;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::core::{FieldMap, FieldMapExt, PosError, Result};
use crate::modules::gateways::mappers::tables::MappingTables;
use crate::modules::gateways::models::Response;
use crate::modules::gateways::serializers::DecodedPayload;
use crate::modules::orders::TransactionType;

pub use est_pos::EstPosResponseDataMapper;
pub use inter_pos::InterPosResponseDataMapper;
pub use pay_flex_cp_v4_pos::PayFlexCpV4PosResponseDataMapper;
pub use pay_for_pos::PayForPosResponseDataMapper;

pub trait ResponseDataMapper: Send + Sync {
    fn tables(&self) -> &MappingTables;

    /// Whether the 3-D post-back reports a successful cardholder authentication
    fn is_3d_auth_success(&self, callback: &FieldMap) -> bool;

    fn map_payment_response(&self, tx_type: TransactionType, payload: &DecodedPayload) -> Result<Response>;

    /// 3D_SECURE result: the verified post-back plus the bank's answer to the
    /// confirmation request, or `None` when authentication failed and no
    /// confirmation was sent
    fn map_3d_payment_data(
        &self,
        tx_type: TransactionType,
        callback: &FieldMap,
        payment: Option<&DecodedPayload>,
    ) -> Result<Response>;

    /// 3D_PAY result: the bank charged before posting back
    fn map_3d_pay_response_data(&self, tx_type: TransactionType, callback: &FieldMap) -> Result<Response>;

    fn map_3d_host_response_data(&self, tx_type: TransactionType, callback: &FieldMap) -> Result<Response> {
        self.map_3d_pay_response_data(tx_type, callback)
    }

    fn map_refund_response(&self, payload: &DecodedPayload) -> Result<Response> {
        self.map_payment_response(TransactionType::Refund, payload)
    }

    fn map_cancel_response(&self, payload: &DecodedPayload) -> Result<Response> {
        self.map_payment_response(TransactionType::Cancel, payload)
    }

    fn map_status_response(&self, payload: &DecodedPayload) -> Result<Response>;

    fn map_history_response(&self, _payload: &DecodedPayload) -> Result<Response> {
        Err(PosError::not_implemented("history response"))
    }
}

pub(crate) fn owned(fields: &FieldMap, key: &str) -> Option<String> {
    fields.value(key).map(str::to_string)
}

/// First non-empty value among `keys`
pub(crate) fn first_of(fields: &FieldMap, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| owned(fields, key))
}

pub(crate) fn parse_amount(value: Option<&str>) -> Option<Decimal> {
    value.and_then(|v| Decimal::from_str(v.trim()).ok())
}

/// Post-back fields overlaid with the bank's answer to the confirmation
pub(crate) fn merged_raw(callback: &FieldMap, payment: Option<&DecodedPayload>) -> FieldMap {
    let mut raw = callback.clone();
    if let Some(payment) = payment {
        raw.extend(payment.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    raw
}
