use std::collections::HashMap;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Where a [`RateTable`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateProvenance {
    Live,
    Fallback,
}

/// Currency code -> units of that currency per one base currency unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    rates: HashMap<String, f64>,
    provenance: RateProvenance,
}

impl RateTable {
    pub fn live(rates: HashMap<String, f64>) -> Self {
        Self {
            rates,
            provenance: RateProvenance::Live,
        }
    }

    pub fn fallback(rates: HashMap<String, f64>) -> Self {
        Self {
            rates,
            provenance: RateProvenance::Fallback,
        }
    }

    pub fn provenance(&self) -> RateProvenance {
        self.provenance
    }

    pub fn is_live(&self) -> bool {
        self.provenance == RateProvenance::Live
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Rate used by the conversion formula. Missing, zero and non-finite
    /// entries resolve to the neutral `1`.
    pub fn coefficient(&self, code: &str) -> f64 {
        match self.get(code) {
            Some(rate) if rate.is_finite() && rate != 0.0 => rate,
            _ => 1.0,
        }
    }

    /// Codes from `expected` that this table has no entry for.
    pub fn missing_codes<'a>(&self, expected: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        expected
            .into_iter()
            .filter(|code| !self.rates.contains_key(*code))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Shared rate-sync state. Only the synchronizer writes it; everyone else
/// reads a cloned snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncState {
    pub(super) is_fetching: bool,
    pub(super) last_update_label: Option<String>,
    pub(super) current_rates: Option<RateTable>,
}

impl SyncState {
    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn last_update_label(&self) -> Option<&str> {
        self.last_update_label.as_deref()
    }

    pub fn current_rates(&self) -> Option<&RateTable> {
        self.current_rates.as_ref()
    }
}

/// Payload of the open.er-api `latest` endpoint.
#[derive(Debug, Deserialize)]
pub struct RatesApiResponse {
    pub result: String,
    #[serde(rename = "error-type")]
    pub error_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_rates")]
    pub rates: Option<HashMap<String, f64>>,
}

// ---- Serde helpers ----

fn deserialize_rates<'de, D>(deserializer: D) -> Result<Option<HashMap<String, f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(code, value)| {
            let rate = match value {
                Value::Number(num) => num
                    .as_f64()
                    .ok_or_else(|| <D::Error as de::Error>::custom("invalid numeric rate"))?,
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| <D::Error as de::Error>::custom(format!("invalid rate string: {}", e)))?,
                _ => return Err(<D::Error as de::Error>::custom("unsupported rate type")),
            };
            Ok((code.to_uppercase(), rate))
        })
        .collect::<Result<HashMap<_, _>, _>>()
        .map(Some)
}
