use super::{decode_chain, DecodedPayload, EncodedRequest, Serializer, WireFormat, CONTENT_TYPE_FORM};
use crate::core::{FieldMap, PosError, Result};
use crate::modules::orders::TransactionType;

/// InterPos: form-encoded requests, `;;`/`;;;` delimited responses
#[derive(Debug, Clone, Copy, Default)]
pub struct InterPosSerializer;

impl Serializer for InterPosSerializer {
    fn encode(&self, data: &FieldMap, _tx_type: Option<TransactionType>) -> Result<EncodedRequest> {
        let body = serde_urlencoded::to_string(data)
            .map_err(|e| PosError::serialization(format!("form encoding failed: {}", e)))?;
        Ok(EncodedRequest {
            content_type: CONTENT_TYPE_FORM,
            body,
        })
    }

    fn decode(&self, raw: &[u8], _tx_type: Option<TransactionType>) -> Result<DecodedPayload> {
        decode_chain(raw, &[WireFormat::Delimited])
    }
}
