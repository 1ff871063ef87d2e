pub mod models;

pub use models::{Account, Language, PaymentModel};
