//! Clients, suppliers and enterprises.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    Client,
    Fournisseur,
    Both,
}

impl ContactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactType::Client => "client",
            ContactType::Fournisseur => "fournisseur",
            ContactType::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactNature {
    Person,
    Enterprise,
}

impl ContactNature {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactNature::Person => "person",
            ContactNature::Enterprise => "enterprise",
        }
    }
}

/// Contact as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_type: Option<String>,
    #[serde(default)]
    pub contact_nature: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub speciality: Option<String>,
    #[serde(default)]
    pub matricule_fiscal: Option<String>,
    #[serde(default)]
    pub code_tva: Option<String>,
    #[serde(default)]
    pub code_douane: Option<String>,
    #[serde(default)]
    pub registre_commerce: Option<String>,
    #[serde(default)]
    pub legal_form: Option<String>,
    #[serde(default)]
    pub capital: Option<Decimal>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub employees_count: Option<i64>,
    #[serde(default)]
    pub enterprise_id: Option<i64>,
    #[serde(default)]
    pub enterprise_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

/// Create/update body for a contact.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub contact_type: ContactType,
    #[serde(default = "default_nature")]
    pub contact_nature: ContactNature,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speciality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matricule_fiscal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_tva: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_douane: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registre_commerce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

fn default_nature() -> ContactNature {
    ContactNature::Person
}

fn default_status() -> String {
    "active".to_string()
}

/// `?type=` / `?nature=` filters of the contact listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactFilter {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<ContactType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nature: Option<ContactNature>,
}
