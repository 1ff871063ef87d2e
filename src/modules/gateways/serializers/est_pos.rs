use super::{decode_chain, xml, DecodedPayload, EncodedRequest, Serializer, WireFormat, CONTENT_TYPE_XML};
use crate::core::{FieldMap, Result};
use crate::modules::orders::TransactionType;

pub const ROOT_ELEMENT: &str = "CC5Request";

/// Est family: `CC5Request` XML in, XML out
#[derive(Debug, Clone, Copy, Default)]
pub struct EstPosSerializer;

impl Serializer for EstPosSerializer {
    fn encode(&self, data: &FieldMap, _tx_type: Option<TransactionType>) -> Result<EncodedRequest> {
        Ok(EncodedRequest {
            content_type: CONTENT_TYPE_XML,
            body: xml::encode(ROOT_ELEMENT, data)?,
        })
    }

    fn decode(&self, raw: &[u8], _tx_type: Option<TransactionType>) -> Result<DecodedPayload> {
        decode_chain(raw, &[WireFormat::Xml])
    }
}
