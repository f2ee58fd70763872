//! Exchange rate table and the three-tier target selection

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Target used when the user names none, and the first substitute
pub const REFERENCE_CURRENCY: &str = "USD";

/// Hard cap on rates listed when neither target nor reference is available
pub const MAX_SPREAD_RATES: usize = 5;

/// Full provider table for one base currency
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RateTable {
    pub base: String,
    /// Target code to units of target per one unit of base
    pub rates: BTreeMap<String, f64>,
}

/// Which fallback tier produced an [`ExchangeRecord`]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeTier {
    /// The requested target was in the table
    Requested,
    /// Requested target missing, reference currency used instead
    ReferenceSubstitute,
    /// Neither available, a capped sample of the table
    Spread,
}

/// Either a single base to target rate or a spread of available rates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExchangeRecord {
    Pair {
        base: String,
        target: String,
        rate: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    Spread {
        base: String,
        rates: BTreeMap<String, f64>,
        note: String,
    },
}

impl ExchangeRecord {
    /// Pick the rate to report for `requested_target` out of `table`
    #[must_use]
    pub fn select(table: &RateTable, requested_target: &str) -> Self {
        let base = table.base.clone();

        if let Some(rate) = table.rates.get(requested_target) {
            return Self::Pair {
                base,
                target: requested_target.to_string(),
                rate: *rate,
                note: None,
            };
        }

        if let Some(rate) = table.rates.get(REFERENCE_CURRENCY) {
            let note = format!(
                "Không tìm thấy tỷ giá {base} sang {requested_target}, hiển thị tỷ giá sang {REFERENCE_CURRENCY} thay thế."
            );
            return Self::Pair {
                base,
                target: REFERENCE_CURRENCY.to_string(),
                rate: *rate,
                note: Some(note),
            };
        }

        let rates: BTreeMap<String, f64> = table
            .rates
            .iter()
            .filter(|(code, _)| **code != base)
            .take(MAX_SPREAD_RATES)
            .map(|(code, rate)| (code.clone(), *rate))
            .collect();
        let missing = if requested_target == REFERENCE_CURRENCY {
            REFERENCE_CURRENCY.to_string()
        } else {
            format!("{requested_target} hoặc {REFERENCE_CURRENCY}")
        };
        let note =
            format!("Không có tỷ giá {base} sang {missing}. Dưới đây là một số tỷ giá hiện có.");
        Self::Spread { base, rates, note }
    }

    #[must_use]
    pub fn tier(&self) -> ExchangeTier {
        match self {
            Self::Pair { note: None, .. } => ExchangeTier::Requested,
            Self::Pair { note: Some(_), .. } => ExchangeTier::ReferenceSubstitute,
            Self::Spread { .. } => ExchangeTier::Spread,
        }
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        match self {
            Self::Pair { note, .. } => note.as_deref(),
            Self::Spread { note, .. } => Some(note),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(base: &str, rates: &[(&str, f64)]) -> RateTable {
        RateTable {
            base: base.to_string(),
            rates: rates
                .iter()
                .map(|(code, rate)| (code.to_string(), *rate))
                .collect(),
        }
    }

    #[test]
    fn test_requested_target_present() {
        let rates = table("VND", &[("VND", 1.0), ("EUR", 0.000_036), ("USD", 0.000_039)]);
        let record = ExchangeRecord::select(&rates, "EUR");
        assert_eq!(record.tier(), ExchangeTier::Requested);
        assert!(matches!(&record, ExchangeRecord::Pair { target, .. } if target == "EUR"));
        assert_eq!(record.note(), None);
    }

    #[test]
    fn test_falls_back_to_reference_with_note() {
        let rates = table("VND", &[("VND", 1.0), ("USD", 0.000_039)]);
        let record = ExchangeRecord::select(&rates, "JPY");
        assert_eq!(record.tier(), ExchangeTier::ReferenceSubstitute);
        match &record {
            ExchangeRecord::Pair { target, rate, note, .. } => {
                assert_eq!(target, "USD");
                assert_eq!(*rate, 0.000_039);
                let note = note.as_deref().unwrap();
                assert!(note.contains("JPY"));
                assert!(note.contains("USD"));
            }
            other => panic!("expected pair, got {other:?}"),
        }
    }

    #[test]
    fn test_spread_is_capped_and_skips_base() {
        let rates = table(
            "XAF",
            &[
                ("AUD", 0.0025),
                ("CAD", 0.0022),
                ("CHF", 0.0014),
                ("CNY", 0.012),
                ("EUR", 0.0015),
                ("GBP", 0.0013),
                ("XAF", 1.0),
            ],
        );
        let record = ExchangeRecord::select(&rates, "JPY");
        assert_eq!(record.tier(), ExchangeTier::Spread);
        match &record {
            ExchangeRecord::Spread { rates, note, .. } => {
                assert_eq!(rates.len(), MAX_SPREAD_RATES);
                assert!(!rates.contains_key("XAF"));
                assert!(note.contains("USD"));
            }
            other => panic!("expected spread, got {other:?}"),
        }
    }

    #[test]
    fn test_spread_of_tiny_table() {
        let rates = table("ABC", &[("ABC", 1.0), ("DEF", 2.0)]);
        let record = ExchangeRecord::select(&rates, "USD");
        match record {
            ExchangeRecord::Spread { rates, .. } => assert_eq!(rates.len(), 1),
            other => panic!("expected spread, got {other:?}"),
        }
    }
}
