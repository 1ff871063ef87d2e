//! Virtual POS gateway library
//!
//! One API over the card payment gateways of several Turkish banks: request
//! and response mapping, 3-D Secure form building, callback hash
//! verification and the server-to-server calls that complete a payment.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use crate::core::{Currency, FieldMap, PosError, Result};
pub use modules::accounts::{Account, Language, PaymentModel};
pub use modules::cards::{CardType, CreditCard};
pub use modules::gateways;
pub use modules::gateways::{
    FormData, GatewayRegistry, PosGateway, Response, ResponseStatus, TransactionContext,
};
pub use modules::orders::{HistoryQuery, Order, TransactionType};
