pub mod credit_card;

pub use credit_card::{CardType, CreditCard, ExpiryFormat};
