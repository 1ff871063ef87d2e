// Property tests for installment and amount formatting

#[path = "../helpers/mod.rs"]
mod helpers;

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use vpos::config::Config;
use vpos::gateways::mappers::{AmountFormat, InstallmentFormat};
use vpos::gateways::{GatewayRegistry, PreHashHooks};
use vpos::PaymentModel;

proptest! {
    #[test]
    fn test_multi_installments_are_written_as_is(installment in 2u32..=36) {
        prop_assert_eq!(InstallmentFormat::EmptyForSingle.format(installment), installment.to_string());
        prop_assert_eq!(InstallmentFormat::ZeroForSingle.format(installment), installment.to_string());
    }

    #[test]
    fn test_single_payment_never_leaks_a_count(installment in 0u32..=1) {
        prop_assert_eq!(InstallmentFormat::EmptyForSingle.format(installment), "");
        prop_assert_eq!(InstallmentFormat::ZeroForSingle.format(installment), "0");
    }

    #[test]
    fn test_plain_amount_parses_back(minor in 1i64..10_000_000_000) {
        let amount = Decimal::new(minor, 2);
        let formatted = AmountFormat::Plain.format(amount);

        prop_assert_eq!(Decimal::from_str(&formatted).unwrap(), amount);
        prop_assert!(!formatted.ends_with('0') || !formatted.contains('.'));
    }

    #[test]
    fn test_two_decimal_amount_has_exactly_two_places(minor in 1i64..10_000_000_000, scale in 0u32..=4) {
        let amount = Decimal::new(minor, scale);
        let formatted = AmountFormat::TwoDecimals.format(amount);

        let (_, fraction) = formatted.split_once('.').unwrap();
        prop_assert_eq!(fraction.len(), 2);
        let parsed = Decimal::from_str(&formatted).unwrap();
        prop_assert!((parsed - amount).abs() <= Decimal::new(5, 3));
    }
}

#[test]
fn test_each_bank_formats_single_payment_its_own_way() {
    let transport = helpers::RecordingTransport::new();
    let config = Config::from_lookup(|_| None).unwrap();
    let registry = GatewayRegistry::from_config(&config, helpers::shared(&transport));

    let cases = [
        (helpers::est_account(PaymentModel::ThreeDSecure), ""),
        (helpers::est_v3_account(PaymentModel::ThreeDSecure), ""),
        (helpers::inter_pos_account(PaymentModel::ThreeDSecure), ""),
        (helpers::pay_for_account(PaymentModel::ThreeDSecure), "0"),
        (helpers::pay_flex_account(PaymentModel::ThreeDPay), "0"),
    ];
    for (account, expected) in cases {
        let bank = account.bank().to_string();
        let gateway = registry.create_gateway(account, PreHashHooks::new()).unwrap();
        let tables = gateway.request_mapper().tables();

        assert_eq!(tables.installment(1), expected, "bank {}", bank);
        assert_eq!(tables.installment(6), "6", "bank {}", bank);
    }
}
