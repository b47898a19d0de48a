//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use chrono::NaiveDate;
use core_kernel::CustomerId;
use domain_billing::ChargeType;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use infra_db::repositories::charges::NewCharge;
use infra_db::repositories::customers::NewCustomer;
use serde_json::Value;

use crate::fixtures::DateFixtures;

/// Builder for constructing test customer data
pub struct TestCustomerBuilder {
    name: String,
    email: Option<String>,
    phone: Option<String>,
    currency: Option<String>,
}

impl Default for TestCustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCustomerBuilder {
    /// Creates a new builder with a generated name and email
    pub fn new() -> Self {
        Self {
            name: Name().fake(),
            email: Some(SafeEmail().fake()),
            phone: None,
            currency: None,
        }
    }

    /// Sets the customer name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the currency code
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Builds the new-customer request
    pub fn build(self) -> NewCustomer {
        NewCustomer {
            name: self.name,
            email: self.email,
            phone: self.phone,
            currency: self.currency,
        }
    }
}

/// Builder for constructing test charge data
///
/// Defaults to a 1000-minor-unit USD service charge dated inside the
/// February 2026 fixture period.
pub struct TestChargeBuilder {
    customer_id: CustomerId,
    charge_type: ChargeType,
    amount: i64,
    currency: Option<String>,
    description: Option<String>,
    service_date: Option<NaiveDate>,
    period_from: Option<NaiveDate>,
    period_to: Option<NaiveDate>,
    metadata: Option<Value>,
}

impl TestChargeBuilder {
    /// Creates a new builder for the given customer
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            charge_type: ChargeType::Service,
            amount: 1000,
            currency: Some("usd".to_string()),
            description: None,
            service_date: Some(DateFixtures::mid_february()),
            period_from: None,
            period_to: None,
            metadata: None,
        }
    }

    /// Sets the charge type
    pub fn with_type(mut self, charge_type: ChargeType) -> Self {
        self.charge_type = charge_type;
        self
    }

    /// Sets the amount in minor units
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the currency code
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Omits the currency so the charge inherits the customer's
    pub fn inheriting_currency(mut self) -> Self {
        self.currency = None;
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the service date, clearing any period bounds
    pub fn with_service_date(mut self, date: NaiveDate) -> Self {
        self.service_date = Some(date);
        self.period_from = None;
        self.period_to = None;
        self
    }

    /// Sets the charge's own period, clearing the service date
    pub fn with_period(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.service_date = None;
        self.period_from = Some(from);
        self.period_to = Some(to);
        self
    }

    /// Clears all dates, producing a charge no period can ever select
    pub fn without_dates(mut self) -> Self {
        self.service_date = None;
        self.period_from = None;
        self.period_to = None;
        self
    }

    /// Sets the metadata blob
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Builds the new-charge request
    pub fn build(self) -> NewCharge {
        NewCharge {
            customer_id: self.customer_id,
            charge_type: self.charge_type,
            amount: self.amount,
            currency: self.currency,
            description: self.description,
            service_date: self.service_date,
            period_from: self.period_from,
            period_to: self.period_to,
            metadata: self.metadata,
        }
    }
}
