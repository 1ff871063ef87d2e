use super::{first_of, merged_raw, owned, parse_amount, ResponseDataMapper};
use crate::core::{FieldMap, FieldMapExt, Result};
use crate::modules::gateways::mappers::request::inter_pos::inter_pos_tables;
use crate::modules::gateways::mappers::tables::MappingTables;
use crate::modules::gateways::models::{Response, ResponseStatus};
use crate::modules::gateways::serializers::DecodedPayload;
use crate::modules::orders::TransactionType;

const PROC_RETURN_CODE_SUCCESS: &str = "00";
const MD_STATUS_SUCCESS: &str = "1";

/// InterPos (Denizbank) response mapper
pub struct InterPosResponseDataMapper {
    tables: MappingTables,
}

impl InterPosResponseDataMapper {
    pub fn new() -> Self {
        Self {
            tables: inter_pos_tables(),
        }
    }

    fn status_of(fields: &FieldMap) -> ResponseStatus {
        match fields.value("ProcReturnCode") {
            Some(PROC_RETURN_CODE_SUCCESS) => ResponseStatus::Approved,
            Some(_) => ResponseStatus::Declined,
            None => ResponseStatus::Error,
        }
    }

    fn base_response(&self, tx_type: TransactionType, fields: &FieldMap) -> Response {
        let status = Self::status_of(fields);
        let mut response = Response::new(status);
        response.transaction_type = Some(tx_type);
        response.order_id = owned(fields, "OrderId");
        response.transaction_id = owned(fields, "TransId");
        response.auth_code = owned(fields, "AuthCode");
        response.ref_ret_num = owned(fields, "HostRefNum");
        response.proc_return_code = owned(fields, "ProcReturnCode");
        if status != ResponseStatus::Approved {
            response.error_code = first_of(fields, &["ErrorCode", "ProcReturnCode"]);
            response.error_message = owned(fields, "ErrorMessage");
        }
        response.raw = fields.clone();
        response
    }

    fn declined_auth(tx_type: TransactionType, callback: &FieldMap) -> Response {
        let mut response = Response::new(ResponseStatus::Declined);
        response.transaction_type = Some(tx_type);
        response.order_id = owned(callback, "OrderId");
        response.error_code = first_of(callback, &["ErrorCode", "mdStatus"]);
        response.error_message = first_of(callback, &["ErrorMessage", "mdErrorMsg"]);
        response.raw = callback.clone();
        response
    }

    fn attach_callback_data(&self, response: &mut Response, callback: &FieldMap) {
        response.md_status = owned(callback, "mdStatus");
        response.currency = callback
            .value("Currency")
            .and_then(|token| self.tables.currency_from_token(token));
        response.amount = parse_amount(callback.value("PurchAmount"));
    }
}

impl Default for InterPosResponseDataMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseDataMapper for InterPosResponseDataMapper {
    fn tables(&self) -> &MappingTables {
        &self.tables
    }

    fn is_3d_auth_success(&self, callback: &FieldMap) -> bool {
        callback.value("mdStatus") == Some(MD_STATUS_SUCCESS)
    }

    fn map_payment_response(&self, tx_type: TransactionType, payload: &DecodedPayload) -> Result<Response> {
        Ok(self.base_response(tx_type, &payload.fields))
    }

    fn map_3d_payment_data(
        &self,
        tx_type: TransactionType,
        callback: &FieldMap,
        payment: Option<&DecodedPayload>,
    ) -> Result<Response> {
        let mut response = match payment {
            Some(payment) if self.is_3d_auth_success(callback) => {
                let mut approved = self.base_response(tx_type, &payment.fields);
                approved.raw = merged_raw(callback, Some(payment));
                approved
            }
            _ => Self::declined_auth(tx_type, callback),
        };
        if response.order_id.is_none() {
            response.order_id = owned(callback, "OrderId");
        }
        self.attach_callback_data(&mut response, callback);
        Ok(response)
    }

    fn map_3d_pay_response_data(&self, tx_type: TransactionType, callback: &FieldMap) -> Result<Response> {
        let mut response = if self.is_3d_auth_success(callback) {
            self.base_response(tx_type, callback)
        } else {
            Self::declined_auth(tx_type, callback)
        };
        self.attach_callback_data(&mut response, callback);
        Ok(response)
    }

    fn map_status_response(&self, payload: &DecodedPayload) -> Result<Response> {
        let mut response = self.base_response(TransactionType::Status, &payload.fields);
        response.amount = parse_amount(payload.fields.value("PurchAmount"));
        Ok(response)
    }
}
