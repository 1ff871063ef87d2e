use async_trait::async_trait;
use std::sync::Arc;

use super::gateway_core::GatewayCore;
use super::gateway_trait::PosGateway;
use super::transport::HttpTransport;
use crate::modules::accounts::Account;
use crate::modules::gateways::mappers::{
    EstPosRequestDataMapper, EstPosResponseDataMapper, PreHashHooks, RequestDataMapper,
    ResponseDataMapper,
};
use crate::modules::gateways::mappers::request::est_pos::EstHashVersion;
use crate::modules::gateways::models::{GatewayEndpoints, GatewayKind};
use crate::modules::gateways::serializers::EstPosSerializer;

/// Est family gateway (Akbank, Isbank, Ziraat...), SHA-1 or `ver3` hashing
pub struct EstPos {
    core: GatewayCore,
    request_mapper: EstPosRequestDataMapper,
    response_mapper: EstPosResponseDataMapper,
}

impl EstPos {
    pub fn new(
        account: Account,
        endpoints: GatewayEndpoints,
        transport: Arc<dyn HttpTransport>,
        hooks: PreHashHooks,
    ) -> Self {
        Self::with_mapper(account, endpoints, transport, EstPosRequestDataMapper::new(hooks))
    }

    pub fn v3(
        account: Account,
        endpoints: GatewayEndpoints,
        transport: Arc<dyn HttpTransport>,
        hooks: PreHashHooks,
    ) -> Self {
        Self::with_mapper(account, endpoints, transport, EstPosRequestDataMapper::v3(hooks))
    }

    fn with_mapper(
        account: Account,
        endpoints: GatewayEndpoints,
        transport: Arc<dyn HttpTransport>,
        request_mapper: EstPosRequestDataMapper,
    ) -> Self {
        Self {
            core: GatewayCore::new(account, endpoints, Box::new(EstPosSerializer), transport),
            request_mapper,
            response_mapper: EstPosResponseDataMapper::new(),
        }
    }
}

#[async_trait]
impl PosGateway for EstPos {
    fn kind(&self) -> GatewayKind {
        match self.request_mapper.version() {
            EstHashVersion::V1 => GatewayKind::EstPos,
            EstHashVersion::V3 => GatewayKind::EstV3Pos,
        }
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
