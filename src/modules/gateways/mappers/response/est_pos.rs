use rust_decimal::Decimal;

use super::{first_of, merged_raw, owned, parse_amount, ResponseDataMapper};
use crate::core::{FieldMap, FieldMapExt, Result};
use crate::modules::gateways::mappers::request::est_pos::est_tables;
use crate::modules::gateways::mappers::tables::MappingTables;
use crate::modules::gateways::models::{Response, ResponseStatus};
use crate::modules::gateways::serializers::DecodedPayload;
use crate::modules::orders::TransactionType;

const PROC_RETURN_CODE_SUCCESS: &str = "00";

/// `mdStatus` values of a completed (full or attempted) authentication
const MD_STATUS_SUCCESS: [&str; 4] = ["1", "2", "3", "4"];

/// Tab separated columns of an `Extra.TRX<n>` history row
const HISTORY_COLUMNS: [&str; 10] = [
    "TransType",
    "Status",
    "FirstAmount",
    "CaptureAmount",
    "CreateDate",
    "CaptureDate",
    "AuthCode",
    "HostRefNum",
    "ProcReturnCode",
    "TransId",
];

/// Est family response mapper, shared by the SHA-1 and `ver3` variants
pub struct EstPosResponseDataMapper {
    tables: MappingTables,
}

impl EstPosResponseDataMapper {
    pub fn new() -> Self {
        Self { tables: est_tables() }
    }

    fn status_of(fields: &FieldMap) -> ResponseStatus {
        match (fields.value("Response"), fields.value("ProcReturnCode")) {
            (Some("Error"), _) | (_, None) => ResponseStatus::Error,
            (_, Some(PROC_RETURN_CODE_SUCCESS)) => ResponseStatus::Approved,
            _ => ResponseStatus::Declined,
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
            response.error_code = first_of(fields, &["Extra.ERRORCODE", "ProcReturnCode"]);
            response.error_message = owned(fields, "ErrMsg");
        }
        response.raw = fields.clone();
        response
    }

    fn history_record(row: &str) -> FieldMap {
        HISTORY_COLUMNS
            .iter()
            .zip(row.split('\t'))
            .map(|(column, value)| (column.to_string(), value.trim().to_string()))
            .collect()
    }
}

impl Default for EstPosResponseDataMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseDataMapper for EstPosResponseDataMapper {
    fn tables(&self) -> &MappingTables {
        &self.tables
    }

    fn is_3d_auth_success(&self, callback: &FieldMap) -> bool {
        callback
            .value("mdStatus")
            .is_some_and(|status| MD_STATUS_SUCCESS.contains(&status))
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
                self.base_response(tx_type, &payment.fields)
            }
            _ => {
                let mut declined = Response::new(ResponseStatus::Declined);
                declined.transaction_type = Some(tx_type);
                declined.error_code = owned(callback, "mdStatus");
                declined.error_message = first_of(callback, &["mdErrorMsg", "ErrMsg"]);
                declined
            }
        };

        response.md_status = owned(callback, "mdStatus");
        if response.order_id.is_none() {
            response.order_id = owned(callback, "oid");
        }
        response.currency = callback
            .value("currency")
            .and_then(|token| self.tables.currency_from_token(token));
        response.amount = parse_amount(callback.value("amount"));
        response.raw = merged_raw(callback, payment);
        Ok(response)
    }

    fn map_3d_pay_response_data(&self, tx_type: TransactionType, callback: &FieldMap) -> Result<Response> {
        let mut response = if self.is_3d_auth_success(callback) {
            self.base_response(tx_type, callback)
        } else {
            let mut declined = Response::new(ResponseStatus::Declined);
            declined.transaction_type = Some(tx_type);
            declined.error_code = owned(callback, "mdStatus");
            declined.error_message = first_of(callback, &["mdErrorMsg", "ErrMsg"]);
            declined.raw = callback.clone();
            declined
        };

        response.md_status = owned(callback, "mdStatus");
        response.order_id = owned(callback, "oid").or(response.order_id);
        response.currency = callback
            .value("currency")
            .and_then(|token| self.tables.currency_from_token(token));
        response.amount = parse_amount(callback.value("amount"));
        Ok(response)
    }

    fn map_status_response(&self, payload: &DecodedPayload) -> Result<Response> {
        let fields = &payload.fields;
        let mut response = self.base_response(TransactionType::Status, fields);
        response.order_id = first_of(fields, &["Extra.ORD_ID", "OrderId"]);
        response.transaction_id = first_of(fields, &["Extra.TRANS_ID", "TransId"]);
        response.auth_code = first_of(fields, &["Extra.AUTH_CODE", "AuthCode"]);
        response.ref_ret_num = first_of(fields, &["Extra.HOST_REF_NUM", "HostRefNum"]);
        // Original amount is reported in minor units
        response.amount = parse_amount(fields.value("Extra.ORIG_TRANS_AMT"))
            .map(|minor| minor / Decimal::ONE_HUNDRED);
        Ok(response)
    }

    fn map_history_response(&self, payload: &DecodedPayload) -> Result<Response> {
        let fields = &payload.fields;
        let mut response = self.base_response(TransactionType::History, fields);

        let count = fields
            .value("Extra.TRXCOUNT")
            .and_then(|c| c.parse::<usize>().ok())
            .unwrap_or(0);
        // Only rows actually present; the count is bank-supplied
        let mut rows: Vec<(usize, &str)> = fields
            .iter()
            .filter_map(|(key, row)| {
                let n = key.strip_prefix("Extra.TRX")?.parse::<usize>().ok()?;
                (n >= 1 && n <= count && !row.is_empty()).then_some((n, row.as_str()))
            })
            .collect();
        rows.sort_unstable_by_key(|(n, _)| *n);

        response.records = rows.into_iter().map(|(_, row)| Self::history_record(row)).collect();
        Ok(response)
    }
}
