pub mod hooks;
pub mod request;
pub mod response;
pub mod tables;

pub use hooks::{HookContext, PreHashHook, PreHashHooks};
pub use request::{
    EstPosRequestDataMapper, InterPosRequestDataMapper, PayFlexCpV4PosRequestDataMapper,
    PayForPosRequestDataMapper, RequestDataMapper,
};
pub use response::{
    EstPosResponseDataMapper, InterPosResponseDataMapper, PayFlexCpV4PosResponseDataMapper,
    PayForPosResponseDataMapper, ResponseDataMapper,
};
pub use tables::{AmountFormat, InstallmentFormat, MappingTables};
