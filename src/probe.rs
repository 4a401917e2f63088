use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod summary;

/// A probe as returned by the listing API. Fields belong to the remote schema
/// and are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbeRecord(Map<String, Value>);

impl ProbeRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn id(&self) -> Option<&Value> {
        self.get("id")
    }
}

/// Probes accumulated across every fetched page, in retrieval order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProbeCollection {
    records: Vec<ProbeRecord>,
}

impl ProbeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_page(&mut self, page: Vec<ProbeRecord>) {
        self.records.extend(page);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeRecord> {
        self.records.iter()
    }
}

impl From<Vec<ProbeRecord>> for ProbeCollection {
    fn from(records: Vec<ProbeRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a ProbeCollection {
    type Item = &'a ProbeRecord;
    type IntoIter = std::slice::Iter<'a, ProbeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ProbeCollection, ProbeRecord};

    fn record(value: serde_json::Value) -> ProbeRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_pages_keep_retrieval_order() {
        let mut collection = ProbeCollection::new();
        collection.extend_page(vec![record(json!({"id": 1})), record(json!({"id": 2}))]);
        collection.extend_page(vec![]);
        collection.extend_page(vec![record(json!({"id": 3}))]);

        let ids = collection
            .iter()
            .map(|probe| probe.id().and_then(|id| id.as_u64()).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_record_must_be_an_object() {
        assert!(serde_json::from_value::<ProbeRecord>(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<ProbeRecord>(json!("probe")).is_err());
    }

    #[test]
    fn test_record_serializes_unchanged() {
        let value = json!({"id": 7, "status": {"id": 1, "name": "Connected"}, "tags": []});
        let probe = record(value.clone());
        assert_eq!(serde_json::to_value(&probe).unwrap(), value);
    }
}
