pub mod est_pos;
pub mod gateway_core;
pub mod gateway_registry;
pub mod gateway_trait;
pub mod inter_pos;
pub mod pay_flex_cp_v4_pos;
pub mod pay_for_pos;
pub mod transport;

pub use est_pos::EstPos;
pub use gateway_core::GatewayCore;
pub use gateway_registry::{BankInfo, GatewayRegistry};
pub use gateway_trait::PosGateway;
pub use inter_pos::InterPos;
pub use pay_flex_cp_v4_pos::PayFlexCpV4Pos;
pub use pay_for_pos::PayForPos;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
