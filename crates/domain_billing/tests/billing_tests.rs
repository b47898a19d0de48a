//! Comprehensive tests for domain_billing

use chrono::{NaiveDate, TimeZone, Utc};
use core_kernel::{ChargeId, CustomerId, InvoiceId, TaxRate};
use rust_decimal_macros::dec;

use domain_billing::charge::{distinct_currencies, Charge, ChargeStatus, ChargeType};
use domain_billing::invoice::{
    generate_invoice_number, reconcile_line_items, Invoice, InvoiceStatus, InvoiceTotals,
};
use domain_billing::notification::{group_outstanding_by_customer, NotificationPayload};
use domain_billing::payment::next_status_after_payment;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn charge(amount: i64, currency: &str) -> Charge {
    Charge {
        id: ChargeId::new(),
        customer_id: CustomerId::new(),
        charge_type: ChargeType::Service,
        amount,
        currency: currency.to_string(),
        description: None,
        service_date: Some(d(2026, 2, 10)),
        period_from: None,
        period_to: None,
        status: ChargeStatus::Unbilled,
        invoice_id: None,
        metadata: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn invoice(customer_id: CustomerId, total: i64, amount_paid: i64) -> Invoice {
    Invoice {
        id: InvoiceId::new(),
        customer_id,
        invoice_no: "INV-20260203-ABCDEF".to_string(),
        period_from: d(2026, 2, 1),
        period_to: d(2026, 2, 28),
        status: InvoiceStatus::Issued,
        currency: "usd".to_string(),
        subtotal: total,
        tax_rate: dec!(0),
        tax_amount: 0,
        total,
        amount_paid,
        issued_at: Utc::now(),
        due_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ============================================================================
// Invoice Totals & Line Reconciliation
// ============================================================================

mod aggregation_tests {
    use super::*;

    #[test]
    fn test_reference_example_two_charges_at_fifteen_percent() {
        // 1000 + 500 at 0.15: subtotal 1500, tax 225, total 1725
        let charges = vec![charge(1000, "usd"), charge(500, "usd")];
        let rate = TaxRate::new(dec!(0.15)).unwrap();

        let totals = InvoiceTotals::compute(&charges, rate);
        assert_eq!(totals.subtotal, 1500);
        assert_eq!(totals.tax_amount, 225);
        assert_eq!(totals.total, 1725);

        let items = reconcile_line_items(&charges, rate, totals.tax_amount);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].tax_amount, 150);
        assert_eq!(items[1].tax_amount, 75);
        assert_eq!(items[0].total, 1150);
        assert_eq!(items[1].total, 575);
    }

    #[test]
    fn test_rounding_residue_lands_on_first_line_only() {
        // 333 + 333 + 335 at 0.0725: line taxes are 24 each (sum 72) while
        // the aggregate tax is 73, so the first line absorbs the +1 residue.
        let charges = vec![charge(333, "usd"), charge(333, "usd"), charge(335, "usd")];
        let rate = TaxRate::new(dec!(0.0725)).unwrap();

        let totals = InvoiceTotals::compute(&charges, rate);
        assert_eq!(totals.tax_amount, 73);

        let items = reconcile_line_items(&charges, rate, totals.tax_amount);
        assert_eq!(items[0].tax_amount, 25);
        assert_eq!(items[1].tax_amount, 24);
        assert_eq!(items[2].tax_amount, 24);
        assert_eq!(items[0].total, 333 + 25);
    }

    #[test]
    fn test_conservation_after_reconciliation() {
        let charges = vec![charge(101, "usd"), charge(203, "usd"), charge(307, "usd")];
        let rate = TaxRate::new(dec!(0.0825)).unwrap();

        let totals = InvoiceTotals::compute(&charges, rate);
        let items = reconcile_line_items(&charges, rate, totals.tax_amount);

        let item_amount_sum: i64 = items.iter().map(|i| i.amount).sum();
        let item_tax_sum: i64 = items.iter().map(|i| i.tax_amount).sum();
        let item_total_sum: i64 = items.iter().map(|i| i.total).sum();

        assert_eq!(item_amount_sum, totals.subtotal);
        assert_eq!(item_tax_sum, totals.tax_amount);
        assert_eq!(item_total_sum, totals.total);
        assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
    }

    #[test]
    fn test_negative_discount_charge_reduces_subtotal() {
        let mut discount = charge(-200, "usd");
        discount.charge_type = ChargeType::Discount;
        let charges = vec![charge(1000, "usd"), discount];
        let rate = TaxRate::new(dec!(0.15)).unwrap();

        let totals = InvoiceTotals::compute(&charges, rate);
        assert_eq!(totals.subtotal, 800);
        assert_eq!(totals.tax_amount, 120);
        assert_eq!(totals.total, 920);
    }

    #[test]
    fn test_line_items_preserve_charge_order() {
        let c1 = charge(100, "usd");
        let c2 = charge(200, "usd");
        let rate = TaxRate::new(dec!(0.1)).unwrap();

        let items = reconcile_line_items(&[c1.clone(), c2.clone()], rate, 30);
        assert_eq!(items[0].charge_id, c1.id);
        assert_eq!(items[1].charge_id, c2.id);
    }

    #[test]
    fn test_line_description_defaults() {
        let mut c = charge(100, "usd");
        c.charge_type = ChargeType::Storage;
        c.description = None;
        let rate = TaxRate::new(dec!(0)).unwrap();

        let items = reconcile_line_items(&[c], rate, 0);
        assert_eq!(items[0].description, "storage charge");
    }

    #[test]
    fn test_distinct_currencies_are_sorted_and_lowercased() {
        let charges = vec![charge(100, "USD"), charge(100, "eur"), charge(100, "usd")];
        let currencies: Vec<String> = distinct_currencies(&charges).into_iter().collect();
        assert_eq!(currencies, vec!["eur".to_string(), "usd".to_string()]);
    }

    #[test]
    fn test_invoice_number_embeds_utc_date() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        let number = generate_invoice_number(now);
        assert!(number.starts_with("INV-20261231-"));
    }
}

// ============================================================================
// Payment Status Transitions
// ============================================================================

mod payment_tests {
    use super::*;

    #[test]
    fn test_spec_transition_sequence() {
        // total 1150: pay 100 -> partial, pay 1050 more -> paid
        let after_first = next_status_after_payment(InvoiceStatus::Issued, 100, 1150);
        assert_eq!(after_first, InvoiceStatus::Partial);

        let after_second = next_status_after_payment(after_first, 1150, 1150);
        assert_eq!(after_second, InvoiceStatus::Paid);
    }

    #[test]
    fn test_overpayment_not_capped() {
        let status = next_status_after_payment(InvoiceStatus::Partial, 5000, 1150);
        assert_eq!(status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_draft_survives_zero_payment() {
        let status = next_status_after_payment(InvoiceStatus::Draft, 0, 1150);
        assert_eq!(status, InvoiceStatus::Draft);
    }
}

// ============================================================================
// Notification Grouping
// ============================================================================

mod notification_tests {
    use super::*;

    #[test]
    fn test_two_invoices_one_customer_one_group() {
        let customer = CustomerId::new();
        let invoices = vec![invoice(customer, 100, 50), invoice(customer, 200, 100)];

        let groups = group_outstanding_by_customer(&invoices);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].invoice_count(), 2);
        assert_eq!(groups[0].total_due, 150);
        assert_eq!(groups[0].currency, "usd");
    }

    #[test]
    fn test_settled_invoices_are_dropped() {
        let customer = CustomerId::new();
        let invoices = vec![invoice(customer, 100, 100), invoice(customer, 200, 250)];

        let groups = group_outstanding_by_customer(&invoices);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_customers_keep_first_seen_order() {
        let first = CustomerId::new();
        let second = CustomerId::new();
        let invoices = vec![
            invoice(first, 100, 0),
            invoice(second, 100, 0),
            invoice(first, 300, 0),
        ];

        let groups = group_outstanding_by_customer(&invoices);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].customer_id, first);
        assert_eq!(groups[0].total_due, 400);
        assert_eq!(groups[1].customer_id, second);
    }

    #[test]
    fn test_payload_pay_link_points_at_customer() {
        let customer = CustomerId::new();
        let invoices = vec![invoice(customer, 100, 0)];
        let groups = group_outstanding_by_customer(&invoices);

        let payload = NotificationPayload::for_group(&groups[0], "http://localhost:3000");
        assert_eq!(
            payload.pay_link,
            format!("http://localhost:3000/pay?customerId={}", customer.as_uuid())
        );
        assert_eq!(payload.invoice_count, 1);
        assert_eq!(payload.invoice_ids, groups[0].invoice_ids);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn reconciliation_conserves_totals(
            amounts in prop::collection::vec(-100_000i64..100_000i64, 1..20),
            rate_bp in 0u32..=10_000u32
        ) {
            let rate = TaxRate::new(rust_decimal::Decimal::new(rate_bp as i64, 4)).unwrap();
            let charges: Vec<Charge> = amounts.iter().map(|&a| charge(a, "usd")).collect();

            let totals = InvoiceTotals::compute(&charges, rate);
            let items = reconcile_line_items(&charges, rate, totals.tax_amount);

            let tax_sum: i64 = items.iter().map(|i| i.tax_amount).sum();
            let total_sum: i64 = items.iter().map(|i| i.total).sum();

            prop_assert_eq!(tax_sum, totals.tax_amount);
            prop_assert_eq!(total_sum, totals.total);
            prop_assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
        }

        #[test]
        fn only_first_line_deviates_from_local_rounding(
            amounts in prop::collection::vec(1i64..100_000i64, 2..20),
            rate_bp in 0u32..=10_000u32
        ) {
            let rate = TaxRate::new(rust_decimal::Decimal::new(rate_bp as i64, 4)).unwrap();
            let charges: Vec<Charge> = amounts.iter().map(|&a| charge(a, "usd")).collect();

            let totals = InvoiceTotals::compute(&charges, rate);
            let items = reconcile_line_items(&charges, rate, totals.tax_amount);

            for (item, c) in items.iter().zip(&charges).skip(1) {
                prop_assert_eq!(item.tax_amount, rate.tax_on_minor(c.amount));
            }
        }
    }
}
