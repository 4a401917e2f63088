use itertools::Itertools;
use serde_json::Value;

use super::ProbeRecord;

pub const HEADER: [&str; 16] = [
    "#<id>",
    "<asn_v4>",
    "<address_v4>",
    "<pfx_v4>",
    "<asn_v6>",
    "<address_v6>",
    "<pfx_v6>",
    "<country>",
    "<lat>",
    "<lng>",
    "<anchor?>",
    "<public?>",
    "<last_connect>",
    "<status>",
    "<status_ts>",
    "<tags>",
];

const TAG_SEPARATOR: &str = "+";

// Placeholder coordinate for probes without a location.
const UNKNOWN_COORDINATE: &str = "-1111.0";

/// Flat view of a probe, one column per header field.
#[derive(Debug, PartialEq)]
pub struct ProbeSummary {
    columns: Vec<String>,
}

impl ProbeSummary {
    pub fn from_record(probe: &ProbeRecord) -> Self {
        let scalar = |field: &str| probe.get(field).map(render_scalar).unwrap_or_default();
        let flag = |field: &str| {
            let set = probe.get(field).and_then(Value::as_bool).unwrap_or(false);
            String::from(if set { "1" } else { "0" })
        };

        // GeoJSON points are [longitude, latitude].
        let (lat, lng) = match coordinates(probe) {
            Some((x, y)) => (render_scalar(y), render_scalar(x)),
            None => (UNKNOWN_COORDINATE.to_string(), UNKNOWN_COORDINATE.to_string()),
        };

        let status = probe
            .get("status")
            .and_then(|status| status.get("name"))
            .map(|name| render_scalar(name).to_uppercase())
            .unwrap_or_default();

        let tags = probe
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(|tag| tag.get("slug"))
                    .map(render_scalar)
                    .join(TAG_SEPARATOR)
            })
            .unwrap_or_default();

        let columns = vec![
            scalar("id"),
            scalar("asn_v4"),
            scalar("address_v4"),
            scalar("prefix_v4"),
            scalar("asn_v6"),
            scalar("address_v6"),
            scalar("prefix_v6"),
            scalar("country_code"),
            lat,
            lng,
            flag("is_anchor"),
            flag("is_public"),
            scalar("last_connected"),
            status,
            scalar("status_since"),
            tags,
        ];

        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

fn coordinates(probe: &ProbeRecord) -> Option<(&Value, &Value)> {
    let point = probe
        .get("geometry")?
        .get("coordinates")?
        .as_array()?;
    match point.as_slice() {
        [x, y] if !x.is_null() && !y.is_null() => Some((x, y)),
        _ => None,
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
