use async_trait::async_trait;
use std::sync::Arc;

use super::gateway_core::GatewayCore;
use super::gateway_trait::PosGateway;
use super::transport::HttpTransport;
use crate::modules::accounts::Account;
use crate::modules::gateways::mappers::{
    InterPosRequestDataMapper, InterPosResponseDataMapper, PreHashHooks, RequestDataMapper,
    ResponseDataMapper,
};
use crate::modules::gateways::models::{GatewayEndpoints, GatewayKind};
use crate::modules::gateways::serializers::InterPosSerializer;

/// InterPos (Denizbank) gateway: form fields out, `;;` delimited answers back
pub struct InterPos {
    core: GatewayCore,
    request_mapper: InterPosRequestDataMapper,
    response_mapper: InterPosResponseDataMapper,
}

impl InterPos {
    pub fn new(
        account: Account,
        endpoints: GatewayEndpoints,
        transport: Arc<dyn HttpTransport>,
        hooks: PreHashHooks,
    ) -> Self {
        Self {
            core: GatewayCore::new(account, endpoints, Box::new(InterPosSerializer), transport),
            request_mapper: InterPosRequestDataMapper::new(hooks),
            response_mapper: InterPosResponseDataMapper::new(),
        }
    }
}

#[async_trait]
impl PosGateway for InterPos {
    fn kind(&self) -> GatewayKind {
        GatewayKind::InterPos
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
