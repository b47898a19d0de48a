//! Notification DTOs

use core_kernel::CustomerId;
use domain_billing::CustomerNotificationSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationsQuery {
    /// Restricts the sweep to one customer when present
    pub customer_id: Option<CustomerId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationsResponse {
    /// Number of customers notified in this run
    pub customers_notified: usize,
    /// Per-customer notification summaries
    pub results: Vec<CustomerNotificationSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_response_wire_shape() {
        let body = SendNotificationsResponse {
            customers_notified: 1,
            results: vec![CustomerNotificationSummary {
                customer_id: CustomerId::new(),
                invoice_count: 2,
                total_due: 3300,
                currency: "usd".to_string(),
            }],
        };
        let json = serde_json::to_value(&body).expect("serializes");

        assert_eq!(json["customersNotified"], 1);
        assert_eq!(json["results"][0]["invoiceCount"], 2);
        assert_eq!(json["results"][0]["totalDue"], 3300);
        assert!(json.get("notified").is_none());
    }
}
