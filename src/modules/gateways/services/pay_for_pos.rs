use async_trait::async_trait;
use std::sync::Arc;

use super::gateway_core::GatewayCore;
use super::gateway_trait::PosGateway;
use super::transport::HttpTransport;
use crate::modules::accounts::Account;
use crate::modules::gateways::mappers::{
    PayForPosRequestDataMapper, PayForPosResponseDataMapper, PreHashHooks, RequestDataMapper,
    ResponseDataMapper,
};
use crate::modules::gateways::models::{GatewayEndpoints, GatewayKind};
use crate::modules::gateways::serializers::PayForPosSerializer;

/// PayFor (QNB Finansbank) gateway.
///
/// Answers are XML with stray line breaks inside elements, except history
/// which comes back as JSON; the serializer handles both. Refunds are only
/// accepted for the full amount and not on the day of the purchase; cancel
/// same-day payments instead.
pub struct PayForPos {
    core: GatewayCore,
    request_mapper: PayForPosRequestDataMapper,
    response_mapper: PayForPosResponseDataMapper,
}

impl PayForPos {
    pub fn new(
        account: Account,
        endpoints: GatewayEndpoints,
        transport: Arc<dyn HttpTransport>,
        hooks: PreHashHooks,
    ) -> Self {
        Self {
            core: GatewayCore::new(account, endpoints, Box::new(PayForPosSerializer), transport),
            request_mapper: PayForPosRequestDataMapper::new(hooks),
            response_mapper: PayForPosResponseDataMapper::new(),
        }
    }
}

#[async_trait]
impl PosGateway for PayForPos {
    fn kind(&self) -> GatewayKind {
        GatewayKind::PayForPos
    }

    fn core(&self) -> &GatewayCore {
        &self.core
    }

    fn request_mapper(&self) -> &dyn RequestDataMapper {
        &self.request_mapper
    }

    fn response_mapper(&self) -> &dyn ResponseDataMapper {
        &self.response_mapper
    }
}
