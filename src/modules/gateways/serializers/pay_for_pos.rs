use super::{
    decode_chain, decode_text, normalize_line_breaks, xml, DecodedPayload, EncodedRequest,
    Serializer, WireFormat, CONTENT_TYPE_XML,
};
use crate::core::{FieldMap, PosError, Result};
use crate::modules::orders::TransactionType;

pub const ROOT_ELEMENT: &str = "PayforRequest";

/// PayFor: `PayforRequest` XML in; XML out, except history which answers in JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct PayForPosSerializer;

impl Serializer for PayForPosSerializer {
    fn encode(&self, data: &FieldMap, _tx_type: Option<TransactionType>) -> Result<EncodedRequest> {
        Ok(EncodedRequest {
            content_type: CONTENT_TYPE_XML,
            body: xml::encode(ROOT_ELEMENT, data)?,
        })
    }

    fn decode(&self, raw: &[u8], _tx_type: Option<TransactionType>) -> Result<DecodedPayload> {
        let normalized = normalize_line_breaks(&decode_text(raw));
        decode_chain(normalized.as_bytes(), &[WireFormat::Xml, WireFormat::Json]).map_err(|e| match e {
            // report the bytes the bank actually sent
            PosError::UnparsableResponse { reason, .. } => PosError::unparsable(reason, raw),
            other => other,
        })
    }
}
