use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    #[default]
    Pending,
    Success,
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementStatus::Pending => write!(f, "pending"),
            SettlementStatus::Success => write!(f, "success"),
        }
    }
}

/// Outcome of a single settlement check, serialized as `{"status": ...}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub struct SettlementCheck {
    pub status: SettlementStatus,
}

impl SettlementCheck {
    pub fn pending() -> Self {
        Self {
            status: SettlementStatus::Pending,
        }
    }

    pub fn success() -> Self {
        Self {
            status: SettlementStatus::Success,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status == SettlementStatus::Success
    }
}

/// One incoming payment from the merchant's mutation history.
///
/// The feed reports `amount` as a string (`"Rp 10.000"`) or a number. Any other
/// shape, or a missing amount, leaves the record unmatchable without
/// invalidating the rest of the history.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Mutation {
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    #[serde(flatten)]
    pub details: HashMap<String, serde_json::Value>,
}

impl Mutation {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: Some(serde_json::Value::String(amount.into())),
            details: HashMap::new(),
        }
    }

    /// The reported amount as text. Whole numbers render without a fraction,
    /// so `10000.0` and `1e4` both read `"10000"`.
    pub fn amount_text(&self) -> Option<String> {
        match self.amount.as_ref()? {
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Number(number) => {
                if number.is_u64() || number.is_i64() {
                    return Some(number.to_string());
                }
                match number.as_f64() {
                    Some(value) if value.is_finite() && value.fract() == 0.0 => {
                        Some(format!("{:.0}", value))
                    }
                    _ => Some(number.to_string()),
                }
            }
            _ => None,
        }
    }
}

/// Body returned by the mutation feed. `data` may be absent or `null`.
#[derive(Debug, Deserialize, Default)]
pub struct MutationHistory {
    #[serde(default)]
    pub data: Option<Vec<Mutation>>,
}

/// Keeps only the ASCII digits of an amount (`"Rp 10.000"` -> `"10000"`).
pub fn normalize_digits(amount: &str) -> String {
    amount.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Whether any mutation reports exactly `expected_amount` once both sides are
/// reduced to their digits.
pub fn contains_amount(mutations: &[Mutation], expected_amount: &str) -> bool {
    let expected = normalize_digits(expected_amount);
    mutations
        .iter()
        .filter_map(Mutation::amount_text)
        .any(|amount| normalize_digits(&amount) == expected)
}
