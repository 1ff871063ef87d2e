pub mod account;
pub mod payment_model;

pub use account::Account;
pub use payment_model::{Language, PaymentModel};
