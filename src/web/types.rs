//! Request and response DTOs for the client info gateway.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::db::ClientAttributes;

// --- Submit / update ---

/// Form body shared by the submit and update endpoints.
///
/// Field names match the HTML inputs (camelCase for the two compound names).
/// Blank inputs deserialize to `None` and end up as storage NULLs; numeric
/// fields that are present but unparsable are rejected by the extraction
/// layer before a handler runs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfoForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub occupation: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub income: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub marital_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub dependencies: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub financial_goal: Option<String>,
}

impl ClientInfoForm {
    /// The six non-key attributes, ready to bind.
    pub fn into_attributes(self) -> ClientAttributes {
        ClientAttributes {
            age: self.age,
            occupation: self.occupation,
            income: self.income,
            marital_status: self.marital_status,
            dependencies: self.dependencies,
            financial_goal: self.financial_goal,
        }
    }
}

// --- Delete / search ---

/// Body carrying only the client name (delete JSON body, search form body).
#[derive(Debug, Default, Deserialize)]
pub struct ClientNameRequest {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
}

// --- Search response ---

/// JSON projection returned by the search endpoint. The generated id is
/// never exposed.
#[derive(Debug, Serialize)]
pub struct ClientInfoResponse {
    pub name: String,
    pub age: Option<i32>,
    pub occupation: Option<String>,
    pub income: Option<Decimal>,
    pub marital_status: Option<String>,
    pub dependencies: Option<i32>,
    pub financial_goal: Option<String>,
}

// --- Health ---

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

/// Deserialize a form value, mapping a missing or blank input to `None`.
///
/// HTML forms submit empty strings for untouched inputs; those must become
/// NULL, not a parse error. Present values are trimmed and parsed.
fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}
