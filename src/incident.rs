//! Incident records as served by the backend.
//!
//! The dashboard never validates or derives anything from these fields; they
//! are carried around for display only.

use serde::{Deserialize, Serialize};

/// One dispatched incident.
///
/// Only `id` is guaranteed by the backend, every other column is nullable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Incident {
    pub id: i64,
    #[serde(default)]
    pub incident_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub alarm: Option<i64>,
    #[serde(default)]
    pub enroute_time: Option<String>,
    #[serde(default)]
    pub arrive_time: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub apparatus: Option<String>,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub scan_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Labels in display order, shared by the table header and the detail panel
pub const FIELD_LABELS: [&str; 10] = [
    "Incident ID",
    "Type",
    "Alarm",
    "Enroute Time",
    "Arrive Time",
    "Address",
    "Apparatus",
    "Total",
    "Scan Date",
    "Created At",
];

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl Incident {
    /// Field values in the same order as [`FIELD_LABELS`]. Missing values render empty.
    pub fn display_values(&self) -> [String; 10] {
        [
            text(&self.incident_id),
            text(&self.kind),
            number(self.alarm),
            text(&self.enroute_time),
            text(&self.arrive_time),
            text(&self.address),
            text(&self.apparatus),
            number(self.total),
            text(&self.scan_date),
            text(&self.created_at),
        ]
    }

    /// `(label, value)` pairs for card-style rendering
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, String)> {
        FIELD_LABELS.into_iter().zip(self.display_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_row_with_nulls() {
        let json = r#"{
            "id": 42,
            "incident_id": "F24-0001",
            "type": "Structure Fire",
            "alarm": 2,
            "enroute_time": "12:01:00",
            "arrive_time": null,
            "address": "123 Main St",
            "apparatus": "E1,L3",
            "total": null,
            "scan_date": "2024-03-01",
            "created_at": "2024-03-01T12:00:00"
        }"#;

        let incident: Incident = serde_json::from_str(json).unwrap();
        assert_eq!(incident.id, 42);
        assert_eq!(incident.kind.as_deref(), Some("Structure Fire"));
        assert_eq!(incident.arrive_time, None);

        let values = incident.display_values();
        assert_eq!(values[2], "2");
        assert_eq!(values[4], "");
        assert_eq!(values[7], "");
    }

    #[test]
    fn missing_columns_default_to_none() {
        let incident: Incident = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(incident, Incident { id: 1, ..Default::default() });
    }

    #[test]
    fn fields_follow_label_order() {
        let incident = Incident {
            id: 3,
            address: Some("9 Elm Rd".into()),
            ..Default::default()
        };
        let (label, value) = incident.fields().nth(5).unwrap();
        assert_eq!(label, "Address");
        assert_eq!(value, "9 Elm Rd");
    }

    #[test]
    fn serializes_kind_back_as_type() {
        let incident = Incident {
            id: 5,
            kind: Some("EMS".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&incident).unwrap();
        assert_eq!(value["type"], "EMS");
    }
}
