use crate::{ApiConfig, Labels};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// An extra key-value mapping merged into the envelope after the core fields
pub type Fragment = Map<String, Value>;

/// Build a fragment from key-value pairs
pub fn fragment<K, V, I>(pairs: I) -> Fragment
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Response body: an ordered mapping of label to value
///
/// Key order is insertion order. Overwriting an existing key keeps its
/// position, new keys are appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Envelope(Map<String, Value>);

impl Envelope {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    fn merge(&mut self, fragment: Fragment) {
        for (key, value) in fragment {
            self.0.insert(key, value);
        }
    }
}

impl From<Envelope> for Value {
    fn from(envelope: Envelope) -> Self {
        envelope.into_value()
    }
}

/// Label and representation settings used to assemble envelopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeFormat {
    labels: Labels,
    stringify: bool,
    include_data_count: bool,
}

impl EnvelopeFormat {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            labels: config.keys.clone(),
            stringify: config.stringify,
            include_data_count: config.include_data_count,
        }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Status as it appears in the envelope: `200` or `"200"`
    pub fn status_value(&self, status: u16) -> Value {
        if self.stringify {
            Value::String(status.to_string())
        } else {
            Value::from(status)
        }
    }

    /// Element count for the payload, if one should be emitted.
    /// Non-empty arrays and maps are counted; scalars never are.
    pub fn data_count(&self, data: &Value) -> Option<usize> {
        if !self.include_data_count {
            return None;
        }
        match data {
            Value::Array(items) if !items.is_empty() => Some(items.len()),
            Value::Object(fields) if !fields.is_empty() => Some(fields.len()),
            _ => None,
        }
    }

    /// Assemble an envelope.
    ///
    /// Field order is status, message, data, the optional count, then every
    /// fragment in order. A fragment key overwrites any earlier value,
    /// including the core fields.
    pub fn build<I>(&self, status: u16, message: Option<&str>, data: Value, extras: I) -> Envelope
    where
        I: IntoIterator<Item = Fragment>,
    {
        let count = self.data_count(&data);

        let mut envelope = Envelope::default();
        envelope.insert(self.labels.status.as_str(), self.status_value(status));
        envelope.insert(
            self.labels.message.as_str(),
            message.map_or(Value::Null, Value::from),
        );
        envelope.insert(self.labels.data.as_str(), data);

        if let Some(count) = count {
            envelope.insert(self.labels.data_count.as_str(), Value::from(count));
        }

        let mut merged = 0;
        for extra in extras {
            envelope.merge(extra);
            merged += 1;
        }

        debug!(
            status,
            data_count = count,
            fragments = merged,
            "Built response envelope"
        );

        envelope
    }
}
