//! Enumerations stored on the order header

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Tender Method
// ============================================================================

/// Payment channel used to settle an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TenderMethod {
    Cash,
    Card,
}

impl TenderMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
        }
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl fmt::Display for TenderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised enum text (tender or status)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for TenderMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            other => Err(UnknownVariant {
                kind: "tender method",
                value: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// Order Status
// ============================================================================

/// Order lifecycle: `Created` → `Refunded`, one way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Created,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Refunded => "refunded",
        }
    }

    /// Refunded is terminal
    pub fn can_refund(&self) -> bool {
        matches!(self, Self::Created)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownVariant {
                kind: "order status",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tender_round_trips_through_text() {
        for tender in [TenderMethod::Cash, TenderMethod::Card] {
            assert_eq!(tender.as_str().parse::<TenderMethod>(), Ok(tender));
        }
        assert!("voucher".parse::<TenderMethod>().is_err());
    }

    #[test]
    fn test_tender_serde_lowercase() {
        let json = serde_json::to_string(&TenderMethod::Card).unwrap();
        assert_eq!(json, "\"card\"");
        let parsed: TenderMethod = serde_json::from_str("\"cash\"").unwrap();
        assert_eq!(parsed, TenderMethod::Cash);
    }

    #[test]
    fn test_status_is_one_way() {
        assert!(OrderStatus::Created.can_refund());
        assert!(!OrderStatus::Refunded.can_refund());
        assert_eq!(OrderStatus::default(), OrderStatus::Created);
    }

    #[test]
    fn test_unknown_status_message() {
        let err = "void".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown order status: void");
    }
}
