pub mod models;

pub use models::{CardType, CreditCard, ExpiryFormat};
