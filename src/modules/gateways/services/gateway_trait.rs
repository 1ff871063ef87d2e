use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::gateway_core::GatewayCore;
use crate::core::{FieldMap, PosError, Result};
use crate::modules::accounts::{Account, PaymentModel};
use crate::modules::cards::CreditCard;
use crate::modules::gateways::mappers::{RequestDataMapper, ResponseDataMapper};
use crate::modules::gateways::models::{
    FormData, GatewayKind, Response, TransactionContext, TransactionState,
};
use crate::modules::orders::{HistoryQuery, Order, TransactionType};

/// Uniform payment operations over one bank account.
///
/// Gateways keep no per-payment state: the lifecycle of each payment lives in
/// the [`TransactionContext`] the caller passes in, so a gateway may serve
/// any number of payments at once. The default flows cover banks whose 3-D
/// confirmation is a second charge request; banks that differ override them.
#[async_trait]
pub trait PosGateway: Send + Sync {
    fn kind(&self) -> GatewayKind;

    fn core(&self) -> &GatewayCore;

    fn request_mapper(&self) -> &dyn RequestDataMapper;

    fn response_mapper(&self) -> &dyn ResponseDataMapper;

    fn account(&self) -> &Account {
        self.core().account()
    }

    /// Validates the order for `tx_type` and records it on the context
    fn prepare(
        &self,
        ctx: &mut TransactionContext,
        order: Order,
        tx_type: TransactionType,
        card: Option<CreditCard>,
    ) -> Result<()> {
        match tx_type {
            TransactionType::PayAuth | TransactionType::PayPreAuth => {
                order.to_payment()?;
            }
            TransactionType::PayPostAuth => {
                order.to_post_auth()?;
            }
            TransactionType::Cancel => {
                order.to_cancel()?;
            }
            TransactionType::Refund => {
                order.to_refund()?;
            }
            TransactionType::Status => {
                order.to_status()?;
            }
            TransactionType::History => {
                return Err(PosError::validation(
                    "history is queried with a HistoryQuery, not a prepared order",
                ));
            }
        }

        debug!(
            bank = %self.account().bank(),
            transaction = %ctx.id(),
            order_id = %order.id,
            tx_type = %tx_type,
            model = %ctx.model(),
            "Transaction prepared"
        );
        ctx.set_prepared(order, tx_type, card)
    }

    /// Redirect form for the context's 3-D model
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
        let gateway_url = self.core().endpoints().form_url(model)?;

        let form = self.request_mapper().create_3d_form_data(
            self.account(),
            &order,
            model,
            tx_type,
            gateway_url,
            ctx.card(),
        )?;
        ctx.transition(TransactionState::Awaiting3dRedirect)?;

        info!(
            bank = %self.account().bank(),
            transaction = %ctx.id(),
            order_id = %order.id,
            model = %model,
            gateway = %form.gateway,
            "3-D form data created"
        );
        Ok(form)
    }

    /// Direct charge, or capture of a pre-authorization
    async fn make_regular_payment(&self, ctx: &mut TransactionContext) -> Result<Response> {
        let tx_type = ctx.require_tx_type()?;
        let order = ctx.require_order()?;
        let account = self.account();

        let data = match tx_type {
            TransactionType::PayPostAuth => self
                .request_mapper()
                .create_non_secure_post_auth_payment_request_data(account, &order.to_post_auth()?)?,
            _ => {
                let card = ctx.card().ok_or_else(|| PosError::missing_field("card"))?;
                self.request_mapper().create_non_secure_payment_request_data(
                    account,
                    &order.to_payment()?,
                    tx_type,
                    card,
                )?
            }
        };

        ctx.transition(TransactionState::Confirmed)?;
        let payload = self
            .core()
            .send(&data, Some(tx_type), &self.core().endpoints().api_url)
            .await?;
        let mut response = self.response_mapper().map_payment_response(tx_type, &payload)?;
        response.payment_model = Some(PaymentModel::NonSecure);

        log_completed(account, ctx, &response);
        ctx.set_response(response.clone())?;
        Ok(response)
    }

    /// 3D_SECURE post-back: verify, confirm with the bank, map.
    ///
    /// Nothing is sent unless the callback hash verifies. A failed
    /// cardholder authentication is mapped without contacting the bank.
    async fn make_3d_payment(&self, ctx: &mut TransactionContext, callback: &FieldMap) -> Result<Response> {
        let tx_type = ctx.require_tx_type()?;
        let order = ctx.require_order()?.to_payment()?;
        let account = self.account();

        self.core().verify_callback(self.request_mapper().crypt(), callback)?;

        let mut response = if self.response_mapper().is_3d_auth_success(callback) {
            let data = self.request_mapper().create_3d_payment_request_data(
                account,
                &order,
                tx_type,
                callback,
            )?;
            ctx.transition(TransactionState::Confirmed)?;
            let payload = self
                .core()
                .send(&data, Some(tx_type), &self.core().endpoints().api_url)
                .await?;
            self.response_mapper()
                .map_3d_payment_data(tx_type, callback, Some(&payload))?
        } else {
            warn!(
                bank = %account.bank(),
                transaction = %ctx.id(),
                order_id = %order.id,
                "3-D authentication failed, payment not confirmed"
            );
            self.response_mapper().map_3d_payment_data(tx_type, callback, None)?
        };
        response.payment_model = Some(PaymentModel::ThreeDSecure);

        log_completed(account, ctx, &response);
        ctx.set_response(response.clone())?;
        Ok(response)
    }

    /// 3D_PAY post-back: the bank already charged; verify and map
    async fn make_3d_pay_payment(&self, ctx: &mut TransactionContext, callback: &FieldMap) -> Result<Response> {
        let tx_type = ctx.require_tx_type()?;
        self.core().verify_callback(self.request_mapper().crypt(), callback)?;

        let mut response = self.response_mapper().map_3d_pay_response_data(tx_type, callback)?;
        response.payment_model = Some(PaymentModel::ThreeDPay);

        log_completed(self.account(), ctx, &response);
        ctx.set_response(response.clone())?;
        Ok(response)
    }

    /// 3D_HOST post-back: the bank collected the card and charged; verify and map
    async fn make_3d_host_payment(&self, ctx: &mut TransactionContext, callback: &FieldMap) -> Result<Response> {
        let tx_type = ctx.require_tx_type()?;
        self.core().verify_callback(self.request_mapper().crypt(), callback)?;

        let mut response = self.response_mapper().map_3d_host_response_data(tx_type, callback)?;
        response.payment_model = Some(PaymentModel::ThreeDHost);

        log_completed(self.account(), ctx, &response);
        ctx.set_response(response.clone())?;
        Ok(response)
    }

    /// Routes a prepared transaction to the branch of its payment model
    async fn payment(&self, ctx: &mut TransactionContext, callback: Option<&FieldMap>) -> Result<Response> {
        let require_callback =
            || callback.ok_or_else(|| PosError::missing_field("3-D callback fields"));

        match ctx.model() {
            PaymentModel::NonSecure => self.make_regular_payment(ctx).await,
            PaymentModel::ThreeDSecure => self.make_3d_payment(ctx, require_callback()?).await,
            PaymentModel::ThreeDPay => self.make_3d_pay_payment(ctx, require_callback()?).await,
            PaymentModel::ThreeDHost => self.make_3d_host_payment(ctx, require_callback()?).await,
        }
    }

    async fn cancel(&self, order: &Order) -> Result<Response> {
        let data = self
            .request_mapper()
            .create_cancel_request_data(self.account(), &order.to_cancel()?)?;
        let payload = self
            .core()
            .send(&data, Some(TransactionType::Cancel), &self.core().endpoints().api_url)
            .await?;
        let response = self.response_mapper().map_cancel_response(&payload)?;
        log_operation(self.account(), &order.id, TransactionType::Cancel, &response);
        Ok(response)
    }

    async fn refund(&self, order: &Order) -> Result<Response> {
        let data = self
            .request_mapper()
            .create_refund_request_data(self.account(), &order.to_refund()?)?;
        let payload = self
            .core()
            .send(&data, Some(TransactionType::Refund), &self.core().endpoints().api_url)
            .await?;
        let response = self.response_mapper().map_refund_response(&payload)?;
        log_operation(self.account(), &order.id, TransactionType::Refund, &response);
        Ok(response)
    }

    async fn status(&self, order: &Order) -> Result<Response> {
        let data = self
            .request_mapper()
            .create_status_request_data(self.account(), &order.to_status()?)?;
        let payload = self
            .core()
            .send(&data, Some(TransactionType::Status), self.core().endpoints().query_url())
            .await?;
        let response = self.response_mapper().map_status_response(&payload)?;
        log_operation(self.account(), &order.id, TransactionType::Status, &response);
        Ok(response)
    }

    async fn history(&self, query: &HistoryQuery) -> Result<Response> {
        query.validate()?;
        let data = self
            .request_mapper()
            .create_history_request_data(self.account(), query)?;
        let payload = self
            .core()
            .send(&data, Some(TransactionType::History), &self.core().endpoints().api_url)
            .await?;
        let response = self.response_mapper().map_history_response(&payload)?;
        info!(
            bank = %self.account().bank(),
            status = %response.status,
            records = response.records.len(),
            "History fetched"
        );
        Ok(response)
    }
}

pub(crate) fn log_completed(account: &Account, ctx: &TransactionContext, response: &Response) {
    info!(
        bank = %account.bank(),
        transaction = %ctx.id(),
        order_id = ?response.order_id,
        status = %response.status,
        model = %ctx.model(),
        "Payment completed"
    );
}

fn log_operation(account: &Account, order_id: &str, tx_type: TransactionType, response: &Response) {
    info!(
        bank = %account.bank(),
        order_id = %order_id,
        tx_type = %tx_type,
        status = %response.status,
        "Operation completed"
    );
}
