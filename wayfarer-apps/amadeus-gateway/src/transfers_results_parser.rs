//!  Wayfarer Amadeus Gateway
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Transfers Results Parser

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::json_path::{at, data_array, data_object, text_at, u64_at};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferOffer {
    pub offer_id: Option<String>,
    pub transfer_type: Option<String>,
    pub vehicle: Option<String>,
    pub category: Option<String>,
    pub seats: Option<u64>,
    pub provider: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferOrder {
    pub order_id: Option<String>,
    pub reference: Option<String>,
    pub confirmation_number: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferCancellation {
    pub confirmation_number: Option<String>,
    pub status: Option<String>,
}

/// Offers without a `quotation` have no price to show and are dropped.
pub fn parse_transfer_offers(raw: &Value) -> Result<Vec<TransferOffer>> {
    let mut offers = Vec::new();
    for offer in data_array(raw)? {
        if at(offer, "/quotation").is_none() {
            tracing::warn!(
                "Skipping transfer offer {:?} without quotation",
                text_at(offer, "/id")
            );
            continue;
        }
        offers.push(TransferOffer {
            offer_id: text_at(offer, "/id"),
            transfer_type: text_at(offer, "/transferType"),
            vehicle: text_at(offer, "/vehicle/description"),
            category: text_at(offer, "/vehicle/category"),
            seats: u64_at(offer, "/vehicle/seats/0/count"),
            provider: text_at(offer, "/serviceProvider/name"),
            price: text_at(offer, "/quotation/monetaryAmount"),
            currency: text_at(offer, "/quotation/currencyCode"),
            start_date_time: text_at(offer, "/start/dateTime"),
            end_date_time: text_at(offer, "/end/dateTime"),
        });
    }
    Ok(offers)
}

pub fn parse_transfer_order(raw: &Value) -> Result<TransferOrder> {
    let order = Value::Object(data_object(raw)?.clone());
    Ok(TransferOrder {
        order_id: text_at(&order, "/id"),
        reference: text_at(&order, "/reference"),
        confirmation_number: text_at(&order, "/transfers/0/confirmNbr"),
        status: text_at(&order, "/transfers/0/status"),
    })
}

/// A 2xx without body confirms the cancellation; a returned record without
/// `reservationStatus` reads as cancelled too.
pub fn parse_transfer_cancellation(
    confirmation_number: &str,
    raw: &Value,
) -> Result<TransferCancellation> {
    if raw.is_null() {
        return Ok(TransferCancellation {
            confirmation_number: Some(confirmation_number.to_string()),
            status: Some("CANCELLED".to_string()),
        });
    }
    let data = Value::Object(data_object(raw)?.clone());
    Ok(TransferCancellation {
        confirmation_number: text_at(&data, "/confirmNbr")
            .or_else(|| Some(confirmation_number.to_string())),
        status: text_at(&data, "/reservationStatus").or_else(|| Some("CANCELLED".to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use serde_json::json;

    #[test]
    fn test_offers_without_quotation_are_omitted() {
        let raw = json!({"data": [
            {"id": "5976726751", "transferType": "PRIVATE",
             "start": {"dateTime": "2026-11-10T10:30:00"},
             "vehicle": {"category": "BU", "description": "Business Class Private Transfer",
                         "seats": [{"count": 3}]},
             "serviceProvider": {"name": "Test provider"},
             "quotation": {"monetaryAmount": "63.89", "currencyCode": "USD"}},
            {"id": "999", "transferType": "PRIVATE"}
        ]});
        let offers = parse_transfer_offers(&raw).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].price.as_deref(), Some("63.89"));
        assert_eq!(offers[0].seats, Some(3));
        assert_eq!(offers[0].end_date_time, None);
    }

    #[test]
    fn test_order_and_cancellation() {
        let raw = json!({"data": {"id": "VEg0Wk43fDIwMjEtMTE", "reference": "9811", "transfers": [
            {"status": "CONFIRMED", "confirmNbr": "12029761"}
        ]}});
        let order = parse_transfer_order(&raw).unwrap();
        assert_eq!(order.confirmation_number.as_deref(), Some("12029761"));
        assert_eq!(order.status.as_deref(), Some("CONFIRMED"));

        let raw = json!({"data": {"confirmNbr": "12029761", "reservationStatus": "CANCELLED"}});
        let cancelled = parse_transfer_cancellation("12029761", &raw).unwrap();
        assert_eq!(cancelled.status.as_deref(), Some("CANCELLED"));

        let empty = parse_transfer_cancellation("12029761", &Value::Null).unwrap();
        assert_eq!(empty.confirmation_number.as_deref(), Some("12029761"));

        let sparse = parse_transfer_cancellation("1", &json!({"data": {}})).unwrap();
        assert_eq!(sparse.confirmation_number.as_deref(), Some("1"));
        assert_eq!(sparse.status.as_deref(), Some("CANCELLED"));

        let err = parse_transfer_cancellation("1", &json!({"errors": [{"code": "X"}]})).unwrap_err();
        assert!(matches!(err, GatewayError::Normalization { ref path, .. } if path == "/data"));
    }
}
