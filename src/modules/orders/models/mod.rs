pub mod order;
pub mod transaction_type;

pub use order::{
    CancelOrder, HistoryQuery, Order, PaymentOrder, PostAuthOrder, RecurringFrequency,
    RecurringPlan, RefundOrder, StatusOrder,
};
pub use transaction_type::TransactionType;
