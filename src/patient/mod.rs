use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Acuity level attached to every patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum StatusTag {
    #[serde(rename = "Baixa")]
    Low,
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Alta")]
    High,
}

impl StatusTag {
    pub const ALL: [StatusTag; 3] = [StatusTag::Low, StatusTag::Medium, StatusTag::High];

    /// Localized label, as stored by the backend.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Baixa",
            Self::Medium => "Média",
            Self::High => "Alta",
        }
    }

    /// Exact match against a stored label.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.label() == value)
    }

    /// Accepts the localized label or the English name, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.trim().to_lowercase();
        match lower.as_str() {
            "low" | "baixa" => Some(Self::Low),
            "medium" | "média" | "media" => Some(Self::Medium),
            "high" | "alta" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A patient as returned by `GET /user`.
///
/// `status` is kept as free text: older records and backend drift can carry
/// values outside [`StatusTag`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub name: String,
    pub gender: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub age: Option<String>,
    /// Null or absent becomes `""`; numbers and booleans keep their text form.
    #[serde(default, deserialize_with = "status_as_text")]
    pub status: String,
}

fn status_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_as_text(deserializer)?.unwrap_or_default())
}

/// Reads a JSON scalar (string, number, boolean or null) as optional text.
fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, a number or a boolean")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(ScalarVisitor)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }
    }

    deserializer.deserialize_option(ScalarVisitor)
}

#[derive(Deserialize)]
struct ListEnvelope {
    data: Vec<serde_json::Value>,
}

/// Outcome of decoding a list response.
#[derive(Clone, Debug, Default)]
pub struct DecodedList {
    pub records: Vec<PatientRecord>,
    pub skipped: usize,
}

/// Decodes `{ "data": [...] }`.
///
/// The envelope must be valid; individual entries that are not patient
/// records (missing name or gender, wrong types) are dropped and counted.
pub fn decode_patient_list(body: &[u8]) -> Result<DecodedList, serde_json::Error> {
    let envelope: ListEnvelope = serde_json::from_slice(body)?;
    let mut out = DecodedList::default();
    for (index, value) in envelope.data.into_iter().enumerate() {
        match serde_json::from_value::<PatientRecord>(value) {
            Ok(record) => out.records.push(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed patient record");
                out.skipped += 1;
            }
        }
    }
    Ok(out)
}

/// Calendar components of a birth date. No calendar validation is applied,
/// so `2024-02-31` is accepted as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BirthDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl BirthDate {
    /// Parses `YYYY-MM-DD`, ignoring any trailing time part (`T...`).
    pub fn parse(value: &str) -> Option<Self> {
        let date = value.trim().split('T').next()?;
        let mut parts = date.split('-');
        let year = parts.next()?.trim().parse::<i32>().ok()?;
        let month = parts.next()?.trim().parse::<u32>().ok()?;
        let day = parts.next()?.trim().parse::<u32>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { year, month, day })
    }
}
