//! Supplier Model
//!
//! Same shape as Client; company_name stays required per the shared
//! contact contract.

use serde::{Deserialize, Serialize};

use super::contact::ContactProfile;
use crate::utils::AppError;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

/// Supplier business record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Supplier {
    pub id: i64,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub contact: ContactProfile,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl std::fmt::Display for Supplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.contact.fmt(f)
    }
}

/// Create supplier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierCreate {
    #[serde(flatten)]
    pub contact: ContactProfile,
    pub notes: Option<String>,
}

impl SupplierCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        self.contact.validate()?;
        validate_optional_text(&self.notes, "notes", MAX_NOTE_LEN)
    }
}

/// Update supplier payload — absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierUpdate {
    pub company_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

impl SupplierUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        use crate::utils::validation::*;
        if let Some(company_name) = &self.company_name {
            validate_required_text(company_name, "company_name", MAX_NAME_LEN)?;
        }
        if let Some(name) = &self.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        validate_optional_email(&self.email)?;
        validate_optional_text(&self.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&self.tax_id, "tax_id", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.notes, "notes", MAX_NOTE_LEN)
    }
}
