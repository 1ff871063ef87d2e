pub mod crypt;
pub mod mappers;
pub mod models;
pub mod serializers;
pub mod services;

pub use crypt::Crypt;
pub use mappers::{PreHashHooks, RequestDataMapper, ResponseDataMapper};
pub use models::{
    FormData, FormMethod, GatewayEndpoints, GatewayEnvironment, GatewayKind, Response,
    ResponseStatus, TransactionContext, TransactionState,
};
pub use serializers::{DecodedPayload, Serializer};
pub use services::{
    BankInfo, GatewayRegistry, HttpTransport, PosGateway, ReqwestTransport,
};
