use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::gateway_core::GatewayCore;
use super::gateway_trait::{log_completed, PosGateway};
use super::transport::HttpTransport;
use crate::core::{FieldMap, PosError, Result};
use crate::modules::accounts::{Account, PaymentModel};
use crate::modules::gateways::mappers::{
    PayFlexCpV4PosRequestDataMapper, PayFlexCpV4PosResponseDataMapper, PreHashHooks,
    RequestDataMapper, ResponseDataMapper,
};
use crate::modules::gateways::models::{
    FormData, GatewayKind, GatewayEndpoints, Response, TransactionContext, TransactionState,
};
use crate::modules::gateways::serializers::PayFlexCpV4PosSerializer;
use crate::modules::orders::TransactionType;

/// PayFlex common payment v4 (Vakifbank) gateway.
///
/// The 3-D flow differs from the other banks: the transaction is first
/// registered with the bank, the customer is sent to the bank's common
/// payment page with the returned token, and the post-back, which carries no
/// hash, is confirmed with a status query.
pub struct PayFlexCpV4Pos {
    core: GatewayCore,
    request_mapper: PayFlexCpV4PosRequestDataMapper,
    response_mapper: PayFlexCpV4PosResponseDataMapper,
}

impl PayFlexCpV4Pos {
    pub fn new(
        account: Account,
        endpoints: GatewayEndpoints,
        transport: Arc<dyn HttpTransport>,
        hooks: PreHashHooks,
    ) -> Self {
        Self {
            core: GatewayCore::new(account, endpoints, Box::new(PayFlexCpV4PosSerializer), transport),
            request_mapper: PayFlexCpV4PosRequestDataMapper::new(hooks),
            response_mapper: PayFlexCpV4PosResponseDataMapper::new(),
        }
    }

    /// Confirms a post-back with a status query when the bank reports success
    async fn complete_common_payment(
        &self,
        ctx: &mut TransactionContext,
        callback: &FieldMap,
        model: PaymentModel,
    ) -> Result<Response> {
        let tx_type = ctx.require_tx_type()?;
        let account = self.core.account();

        let mut response = if self.response_mapper.is_3d_auth_success(callback) {
            let data = self
                .request_mapper
                .create_3d_payment_status_request_data(account, callback)?;
            ctx.transition(TransactionState::Confirmed)?;
            let payload = self
                .core
                .send(&data, Some(TransactionType::Status), self.core.endpoints().query_url())
                .await?;
            self.response_mapper
                .map_3d_payment_data(tx_type, callback, Some(&payload))?
        } else {
            warn!(
                bank = %account.bank(),
                transaction = %ctx.id(),
                "Common payment reported failure, skipping status query"
            );
            self.response_mapper.map_3d_pay_response_data(tx_type, callback)?
        };
        response.payment_model = Some(model);

        log_completed(account, ctx, &response);
        ctx.set_response(response.clone())?;
        Ok(response)
    }
}

#[async_trait]
impl PosGateway for PayFlexCpV4Pos {
    fn kind(&self) -> GatewayKind {
        GatewayKind::PayFlexCpV4Pos
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

    /// Registers the transaction, then builds the GET redirect to the common
    /// payment page
    async fn get_3d_form_data(&self, ctx: &mut TransactionContext) -> Result<FormData> {
        let model = ctx.model();
        if !model.is_3d() {
            return Err(PosError::validation(format!(
                "payment model {} has no 3-D form",
                model
            )));
        }
        let order = ctx.require_order()?.to_payment()?;
        let tx_type = ctx.require_tx_type()?;
        let registration_url = self.core.endpoints().form_url(model)?;

        let enrollment = self.request_mapper.create_3d_enrollment_request_data(
            self.core.account(),
            &order,
            model,
            tx_type,
            ctx.card(),
        )?;
        let registration = self
            .core
            .send(&enrollment, Some(tx_type), registration_url)
            .await?;
        let form = self
            .request_mapper
            .create_3d_redirect_form_data(&registration.fields)?;
        ctx.transition(TransactionState::Awaiting3dRedirect)?;

        info!(
            bank = %self.core.account().bank(),
            transaction = %ctx.id(),
            order_id = %order.id,
            gateway = %form.gateway,
            "Common payment registered"
        );
        Ok(form)
    }

    async fn make_3d_payment(&self, _ctx: &mut TransactionContext, _callback: &FieldMap) -> Result<Response> {
        Err(PosError::not_implemented(
            "common payment has no separate 3-D confirmation; use the 3D_PAY flow",
        ))
    }

    async fn make_3d_pay_payment(&self, ctx: &mut TransactionContext, callback: &FieldMap) -> Result<Response> {
        self.complete_common_payment(ctx, callback, PaymentModel::ThreeDPay).await
    }

    async fn make_3d_host_payment(&self, ctx: &mut TransactionContext, callback: &FieldMap) -> Result<Response> {
        self.complete_common_payment(ctx, callback, PaymentModel::ThreeDHost).await
    }
}
