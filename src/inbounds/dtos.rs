use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::models::types::{OrderRequest, Side};
use crate::domain::services::matching_engine::{MatchingError, validate_order};

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Structs:                                                 |
/// |   - OrderRecord                                          |
/// | Implementations:                                         |
/// |   - TryFrom<OrderRecord> for OrderRequest                |
/// +----------------------------------------------------------+

/// A flat order record as it appears in tabular input.
///
/// Every field is optional text so that a missing or malformed value becomes
/// an `InvalidOrder` from the engine rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,

    /// `buy`/`sell` (also `bid`/`ask`), any case.
    #[serde(default)]
    pub side: Option<String>,

    #[serde(default)]
    pub price: Option<String>,

    #[serde(default)]
    pub size: Option<String>,
}

impl OrderRecord {
    pub fn new(id: &str, user_id: &str, side: &str, price: &str, size: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            user_id: Some(user_id.to_string()),
            side: Some(side.to_string()),
            price: Some(price.to_string()),
            size: Some(size.to_string()),
        }
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, MatchingError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| MatchingError::InvalidOrder(format!("{name} is required")))
}

fn parse_decimal(value: &str, name: &str) -> Result<Decimal, MatchingError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| MatchingError::InvalidOrder(format!("{name} is not a number: {value}")))
}

impl TryFrom<OrderRecord> for OrderRequest {
    type Error = MatchingError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let id = required(&record.id, "id")?;
        let user_id = required(&record.user_id, "userId")?;
        let side = required(&record.side, "side")?
            .parse::<Side>()
            .map_err(|err| MatchingError::InvalidOrder(err.to_string()))?;
        let price = parse_decimal(required(&record.price, "price")?, "price")?;
        let size = parse_decimal(required(&record.size, "size")?, "size")?;

        let request = OrderRequest::new(id, user_id, side, price, size);
        validate_order(&request)?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_conversion() {
        let record = OrderRecord::new("s1", "user7", "Sell", "100.25", " 10 ");
        let request = OrderRequest::try_from(record).unwrap();

        assert_eq!(request.id, "s1");
        assert_eq!(request.user_id, "user7");
        assert_eq!(request.side, Side::Ask);
        assert_eq!(request.price, dec!(100.25));
        assert_eq!(request.size, dec!(10));
    }

    #[test]
    fn test_scientific_notation_is_accepted() {
        let record = OrderRecord::new("b1", "u", "buy", "1e2", "2.5");
        let request = OrderRequest::try_from(record).unwrap();
        assert_eq!(request.price, dec!(100));
    }

    #[test]
    fn test_missing_fields_are_invalid() {
        let mut record = OrderRecord::new("b1", "u", "buy", "100", "1");
        record.user_id = None;
        let err = OrderRequest::try_from(record).unwrap_err();
        assert_eq!(err, MatchingError::InvalidOrder("userId is required".to_string()));

        let mut record = OrderRecord::new("b1", "u", "buy", "100", "1");
        record.side = Some("   ".to_string());
        assert!(OrderRequest::try_from(record).is_err());
    }

    #[test]
    fn test_bad_values_are_invalid() {
        for (side, price, size) in [
            ("hold", "100", "1"),
            ("buy", "abc", "1"),
            ("buy", "100", "0"),
            ("sell", "-1", "1"),
        ] {
            let record = OrderRecord::new("x", "u", side, price, size);
            let err = OrderRequest::try_from(record).unwrap_err();
            assert!(matches!(err, MatchingError::InvalidOrder(_)));
        }
    }
}
