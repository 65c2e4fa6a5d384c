//! Shared contact shape embedded by Client and Supplier

use serde::{Deserialize, Serialize};

use crate::utils::AppError;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_email,
    validate_optional_text, validate_required_text,
};

fn default_true() -> bool {
    true
}

/// Common field set for business records.
///
/// `company_name` and `name` are required; everything else is
/// optional. `is_active` defaults to true.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactProfile {
    /// Razón social
    pub company_name: String,
    /// Contact name
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// CUIT/CUIL
    pub tax_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ContactProfile {
    /// Validate required fields and length limits.
    ///
    /// Runs in the handler before any save, so a rejected payload
    /// never reaches the entity store or the audit trail.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.company_name, "company_name", MAX_NAME_LEN)?;
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_optional_email(&self.email)?;
        validate_optional_text(&self.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&self.tax_id, "tax_id", MAX_SHORT_TEXT_LEN)?;
        Ok(())
    }
}

impl std::fmt::Display for ContactProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.company_name, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ContactProfile {
        ContactProfile {
            company_name: "Acme SA".to_string(),
            name: "Jane Roe".to_string(),
            email: None,
            phone: None,
            address: None,
            tax_id: None,
            is_active: true,
        }
    }

    #[test]
    fn test_validate_accepts_minimal_profile() {
        assert!(profile().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_company_name() {
        let mut p = profile();
        p.company_name = "".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_email() {
        let mut p = profile();
        p.email = Some("nope".to_string());
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_display_snapshot() {
        assert_eq!(profile().to_string(), "Acme SA (Jane Roe)");
    }
}
