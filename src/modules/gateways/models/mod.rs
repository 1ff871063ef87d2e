pub mod form_data;
pub mod gateway_config;
pub mod response;
pub mod transaction_context;

pub use form_data::{FormData, FormMethod};
pub use gateway_config::{GatewayEndpoints, GatewayEnvironment, GatewayKind};
pub use response::{Response, ResponseStatus};
pub use transaction_context::{TransactionContext, TransactionState};
