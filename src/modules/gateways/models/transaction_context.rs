use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::response::Response;
use crate::core::{PosError, Result};
use crate::modules::accounts::PaymentModel;
use crate::modules::cards::CreditCard;
use crate::modules::orders::{Order, TransactionType};

/// Lifecycle of one payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    Initialized,
    Prepared,
    Awaiting3dRedirect,
    /// 3-D authentication verified; a confirmation request may be in flight
    Confirmed,
    ResponseMapped,
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionState::Initialized => write!(f, "initialized"),
            TransactionState::Prepared => write!(f, "prepared"),
            TransactionState::Awaiting3dRedirect => write!(f, "awaiting_3d_redirect"),
            TransactionState::Confirmed => write!(f, "confirmed"),
            TransactionState::ResponseMapped => write!(f, "response_mapped"),
        }
    }
}

impl TransactionState {
    fn can_transition_to(self, next: TransactionState) -> bool {
        use TransactionState::*;

        matches!(
            (self, next),
            (Initialized, Prepared)
                | (Prepared, Prepared)
                | (Prepared, Awaiting3dRedirect)
                // the bank post-back may land on a context rebuilt after the redirect
                | (Prepared, Confirmed)
                | (Prepared, ResponseMapped)
                | (Awaiting3dRedirect, Confirmed)
                | (Awaiting3dRedirect, ResponseMapped)
                | (Confirmed, ResponseMapped)
        )
    }
}

/// Per-payment state carried explicitly through the gateway calls.
///
/// Gateways hold no per-transaction fields, so one gateway serves any number
/// of concurrent payments, each with its own context.
#[derive(Debug, Clone)]
pub struct TransactionContext {
    id: Uuid,
    model: PaymentModel,
    state: TransactionState,
    tx_type: Option<TransactionType>,
    order: Option<Order>,
    card: Option<CreditCard>,
    response: Option<Response>,
}

impl TransactionContext {
    pub fn new(model: PaymentModel) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            state: TransactionState::Initialized,
            tx_type: None,
            order: None,
            card: None,
            response: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn model(&self) -> PaymentModel {
        self.model
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn tx_type(&self) -> Option<TransactionType> {
        self.tx_type
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn card(&self) -> Option<&CreditCard> {
        self.card.as_ref()
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn into_response(self) -> Option<Response> {
        self.response
    }

    pub fn require_order(&self) -> Result<&Order> {
        self.order.as_ref().ok_or_else(|| PosError::InvalidState {
            from: self.state.to_string(),
            to: "an operation that needs a prepared order".to_string(),
        })
    }

    pub fn require_tx_type(&self) -> Result<TransactionType> {
        self.tx_type.ok_or_else(|| PosError::InvalidState {
            from: self.state.to_string(),
            to: "an operation that needs a transaction type".to_string(),
        })
    }

    /// A confirmation request went out but no answer was mapped. The payment
    /// may or may not have gone through; query status before anything else.
    pub fn is_status_unknown(&self) -> bool {
        self.state == TransactionState::Confirmed && self.response.is_none()
    }

    pub fn transition(&mut self, next: TransactionState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(PosError::InvalidState {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }

    pub(crate) fn set_prepared(&mut self, order: Order, tx_type: TransactionType, card: Option<CreditCard>) -> Result<()> {
        self.transition(TransactionState::Prepared)?;
        self.order = Some(order);
        self.tx_type = Some(tx_type);
        self.card = card;
        Ok(())
    }

    /// Terminal step: exactly one response per transaction
    pub(crate) fn set_response(&mut self, response: Response) -> Result<()> {
        self.transition(TransactionState::ResponseMapped)?;
        self.response = Some(response);
        Ok(())
    }
}
