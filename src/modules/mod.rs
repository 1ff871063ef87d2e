pub mod accounts;
pub mod cards;
pub mod gateways;
pub mod orders;
