pub mod models;

pub use models::{
    CancelOrder, HistoryQuery, Order, PaymentOrder, PostAuthOrder, RecurringFrequency,
    RecurringPlan, RefundOrder, StatusOrder, TransactionType,
};
