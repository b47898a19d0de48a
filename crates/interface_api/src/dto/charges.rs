//! Charge DTOs

use chrono::NaiveDate;
use core_kernel::CustomerId;
use domain_billing::{ChargeStatus, ChargeType};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_charge_dates"))]
pub struct CreateChargeRequest {
    pub customer_id: CustomerId,
    #[serde(rename = "type")]
    pub charge_type: ChargeType,
    /// Signed amount in minor units; discounts are negative
    pub amount: i64,
    /// Defaults to the customer's currency when omitted
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub service_date: Option<NaiveDate>,
    pub period_from: Option<NaiveDate>,
    pub period_to: Option<NaiveDate>,
    pub metadata: Option<Value>,
}

/// A charge's own period carries both bounds or neither, in order
fn validate_charge_dates(req: &CreateChargeRequest) -> Result<(), ValidationError> {
    match (req.period_from, req.period_to) {
        (Some(from), Some(to)) if from > to => Err(ValidationError::new("period_inverted")),
        (Some(_), None) | (None, Some(_)) => Err(ValidationError::new("period_incomplete")),
        _ => Ok(()),
    }
}

/// Distinguishes an explicit `null` (clear the field) from an absent field
/// (leave it alone) on PATCH bodies
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChargeRequest {
    #[serde(rename = "type")]
    pub charge_type: Option<ChargeType>,
    pub amount: Option<i64>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub service_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub period_from: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub period_to: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub metadata: Option<Option<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListChargesQuery {
    pub customer_id: Option<CustomerId>,
    pub status: Option<ChargeStatus>,
    /// Inclusive creation-date window start
    pub from: Option<NaiveDate>,
    /// Inclusive creation-date window end
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateChargeRequest {
        serde_json::from_value(serde_json::json!({
            "customerId": uuid::Uuid::new_v4(),
            "type": "service",
            "amount": 1000,
            "currency": "usd"
        }))
        .expect("valid request")
    }

    #[test]
    fn test_minimal_request_is_valid() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn test_currency_may_be_omitted() {
        let req: CreateChargeRequest = serde_json::from_value(serde_json::json!({
            "customerId": uuid::Uuid::new_v4(),
            "type": "service",
            "amount": 1000
        }))
        .expect("valid request");

        assert!(req.currency.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_half_open_period_is_rejected() {
        let mut req = base_request();
        req.period_from = Some(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_inverted_period_is_rejected() {
        let mut req = base_request();
        req.period_from = Some(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        req.period_to = Some(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_type_field_uses_json_name() {
        let req = base_request();
        assert_eq!(req.charge_type, ChargeType::Service);
    }

    #[test]
    fn test_update_distinguishes_absent_from_null() {
        let absent: UpdateChargeRequest =
            serde_json::from_value(serde_json::json!({})).expect("valid");
        assert!(absent.description.is_none());

        let cleared: UpdateChargeRequest =
            serde_json::from_value(serde_json::json!({ "description": null })).expect("valid");
        assert_eq!(cleared.description, Some(None));

        let set: UpdateChargeRequest =
            serde_json::from_value(serde_json::json!({ "description": "updated" }))
                .expect("valid");
        assert_eq!(set.description, Some(Some("updated".to_string())));
    }

    #[test]
    fn test_update_accepts_type_and_currency() {
        let req: UpdateChargeRequest = serde_json::from_value(serde_json::json!({
            "type": "discount",
            "currency": "eur"
        }))
        .expect("valid");

        assert_eq!(req.charge_type, Some(ChargeType::Discount));
        assert_eq!(req.currency.as_deref(), Some("eur"));
    }
}
