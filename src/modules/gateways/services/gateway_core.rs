use std::sync::Arc;

use tracing::{debug, error};

use super::transport::{HttpRequest, HttpTransport};
use crate::core::{FieldMap, PosError, Result};
use crate::modules::accounts::Account;
use crate::modules::gateways::crypt::Crypt;
use crate::modules::gateways::models::GatewayEndpoints;
use crate::modules::gateways::serializers::{DecodedPayload, Serializer};
use crate::modules::orders::TransactionType;

/// What every gateway owns besides its mappers: the merchant account, the
/// bank's URLs, the wire codec and a shared transport handle.
pub struct GatewayCore {
    account: Account,
    endpoints: GatewayEndpoints,
    serializer: Box<dyn Serializer>,
    transport: Arc<dyn HttpTransport>,
}

impl GatewayCore {
    pub fn new(
        account: Account,
        endpoints: GatewayEndpoints,
        serializer: Box<dyn Serializer>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            account,
            endpoints,
            serializer,
            transport,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn endpoints(&self) -> &GatewayEndpoints {
        &self.endpoints
    }

    /// Encodes `data`, posts it to `url` and decodes the answer.
    ///
    /// Field values are never logged; they carry card data and credentials.
    pub async fn send(
        &self,
        data: &FieldMap,
        tx_type: Option<TransactionType>,
        url: &str,
    ) -> Result<DecodedPayload> {
        let encoded = self.serializer.encode(data, tx_type)?;
        debug!(
            bank = %self.account.bank(),
            tx_type = ?tx_type,
            url = %url,
            fields = data.len(),
            "Sending request to bank"
        );

        let response = self
            .transport
            .send(HttpRequest::post(url, encoded.content_type, encoded.body))
            .await
            .map_err(|e| {
                error!(
                    bank = %self.account.bank(),
                    tx_type = ?tx_type,
                    error = %e,
                    "Bank request failed, payment status unknown"
                );
                e
            })?;

        let payload = self.serializer.decode(&response.body, tx_type)?;
        debug!(
            bank = %self.account.bank(),
            format = ?payload.format,
            fields = payload.fields.len(),
            records = payload.records.len(),
            "Decoded bank response"
        );
        Ok(payload)
    }

    /// Fails with `HashMismatch` unless the callback's hash verifies
    pub fn verify_callback(&self, crypt: &dyn Crypt, callback: &FieldMap) -> Result<()> {
        if crypt.check_callback_hash(&self.account, callback)? {
            return Ok(());
        }
        error!(bank = %self.account.bank(), "3-D callback hash mismatch");
        Err(PosError::hash_mismatch(self.account.bank()))
    }
}
