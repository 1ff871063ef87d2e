use super::{first_of, merged_raw, owned, parse_amount, ResponseDataMapper};
use crate::core::{FieldMap, FieldMapExt, PosError, Result};
use crate::modules::gateways::mappers::request::pay_flex_cp_v4_pos::pay_flex_cp_v4_tables;
use crate::modules::gateways::mappers::tables::MappingTables;
use crate::modules::gateways::models::{Response, ResponseStatus};
use crate::modules::gateways::serializers::DecodedPayload;
use crate::modules::orders::TransactionType;

const RESULT_CODE_SUCCESS: &str = "0000";

/// PayFlex common payment v4 (Vakifbank) response mapper.
///
/// API answers carry `ResultCode`, common payment post-backs and status
/// queries carry `Rc`; both use `0000` for success.
pub struct PayFlexCpV4PosResponseDataMapper {
    tables: MappingTables,
}

impl PayFlexCpV4PosResponseDataMapper {
    pub fn new() -> Self {
        Self {
            tables: pay_flex_cp_v4_tables(),
        }
    }

    fn result_code(fields: &FieldMap) -> Option<&str> {
        fields.value("Rc").or_else(|| fields.value("ResultCode"))
    }

    fn status_of(fields: &FieldMap) -> ResponseStatus {
        match Self::result_code(fields) {
            Some(RESULT_CODE_SUCCESS) => ResponseStatus::Approved,
            Some(_) => ResponseStatus::Declined,
            None => ResponseStatus::Error,
        }
    }

    fn base_response(&self, tx_type: TransactionType, fields: &FieldMap) -> Response {
        let status = Self::status_of(fields);
        let mut response = Response::new(status);
        response.transaction_type = Some(tx_type);
        response.order_id = first_of(fields, &["OrderID", "OrderId"]);
        response.transaction_id = owned(fields, "TransactionId");
        response.auth_code = owned(fields, "AuthCode");
        response.ref_ret_num = owned(fields, "Rrn");
        response.proc_return_code = Self::result_code(fields).map(str::to_string);
        response.amount = parse_amount(
            fields
                .value("Amount")
                .or_else(|| fields.value("CurrencyAmount")),
        );
        response.currency = fields
            .value("AmountCode")
            .or_else(|| fields.value("CurrencyCode"))
            .and_then(|token| self.tables.currency_from_token(token));
        if status != ResponseStatus::Approved {
            response.error_code = first_of(fields, &["Rc", "ResultCode", "ErrorCode"]);
            response.error_message = first_of(fields, &["Message", "ResultDetail", "ResponseMessage"]);
        }
        response.raw = fields.clone();
        response
    }
}

impl Default for PayFlexCpV4PosResponseDataMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseDataMapper for PayFlexCpV4PosResponseDataMapper {
    fn tables(&self) -> &MappingTables {
        &self.tables
    }

    fn is_3d_auth_success(&self, callback: &FieldMap) -> bool {
        callback.value("Rc") == Some(RESULT_CODE_SUCCESS)
    }

    fn map_payment_response(&self, tx_type: TransactionType, payload: &DecodedPayload) -> Result<Response> {
        Ok(self.base_response(tx_type, &payload.fields))
    }

    /// `payment` is the status query answer; there is no charge request
    fn map_3d_payment_data(
        &self,
        tx_type: TransactionType,
        callback: &FieldMap,
        payment: Option<&DecodedPayload>,
    ) -> Result<Response> {
        let mut response = match payment {
            Some(query) if self.is_3d_auth_success(callback) => {
                let mut mapped = self.base_response(tx_type, &query.fields);
                mapped.raw = merged_raw(callback, Some(query));
                mapped
            }
            _ => {
                let mut declined = self.base_response(tx_type, callback);
                if declined.status == ResponseStatus::Approved {
                    declined.status = ResponseStatus::Declined;
                }
                declined
            }
        };
        if response.order_id.is_none() {
            response.order_id = first_of(callback, &["OrderID", "OrderId"]);
        }
        response.md_status = owned(callback, "Rc");
        Ok(response)
    }

    fn map_3d_pay_response_data(&self, tx_type: TransactionType, callback: &FieldMap) -> Result<Response> {
        let mut response = self.base_response(tx_type, callback);
        response.md_status = owned(callback, "Rc");
        Ok(response)
    }

    fn map_status_response(&self, _payload: &DecodedPayload) -> Result<Response> {
        Err(PosError::not_implemented("PayFlex common payment status response"))
    }
}
