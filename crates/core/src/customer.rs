//! Delivery details form state.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown [`CustomerField`] name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown customer field: {0} (expected name, email or address)")]
pub struct CustomerFieldError(pub String);

/// One of the three delivery fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerField {
    Name,
    Email,
    Address,
}

impl CustomerField {
    /// Every field, in form order.
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Address];
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
            Self::Address => write!(f, "address"),
        }
    }
}

impl std::str::FromStr for CustomerField {
    type Err = CustomerFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "address" => Ok(Self::Address),
            _ => Err(CustomerFieldError(s.to_owned())),
        }
    }
}

/// Name, email and delivery address as typed by the customer.
///
/// Values are free-form and unvalidated; completeness is only checked when
/// an order is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub address: String,
}

impl CustomerDetails {
    /// Replace one field, leaving the others untouched.
    pub fn set_field(&mut self, field: CustomerField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// Current value of `field`.
    #[must_use]
    pub fn field(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Name => &self.name,
            CustomerField::Email => &self.email,
            CustomerField::Address => &self.address,
        }
    }

    const fn field_mut(&mut self, field: CustomerField) -> &mut String {
        match field {
            CustomerField::Name => &mut self.name,
            CustomerField::Email => &mut self.email,
            CustomerField::Address => &mut self.address,
        }
    }

    /// Fields that are still empty strings. Whitespace counts as filled in.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<CustomerField> {
        CustomerField::ALL
            .into_iter()
            .filter(|field| self.field(*field).is_empty())
            .collect()
    }

    /// Whether all three fields are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        CustomerField::ALL
            .iter()
            .all(|field| !self.field(*field).is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_touches_only_one() {
        let mut details = CustomerDetails::default();
        details.set_field(CustomerField::Name, "Ada");
        details.set_field(CustomerField::Address, "1 Flame St");
        details.set_field(CustomerField::Name, "Ada L.");

        assert_eq!(details.name, "Ada L.");
        assert_eq!(details.email, "");
        assert_eq!(details.address, "1 Flame St");
    }

    #[test]
    fn test_is_complete_requires_all_three() {
        let mut details = CustomerDetails::default();
        assert!(!details.is_complete());
        assert_eq!(details.missing_fields(), CustomerField::ALL);

        details.set_field(CustomerField::Name, "Ada");
        details.set_field(CustomerField::Address, "1 Flame St");
        assert!(!details.is_complete());
        assert_eq!(details.missing_fields(), [CustomerField::Email]);

        details.set_field(CustomerField::Email, "ada@example.com");
        assert!(details.is_complete());
        assert!(details.missing_fields().is_empty());
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        let details = CustomerDetails {
            name: " ".into(),
            email: "\t".into(),
            address: "\n".into(),
        };
        assert!(details.is_complete());
    }

    #[test]
    fn test_parse_field_names() {
        assert_eq!("email".parse::<CustomerField>().unwrap(), CustomerField::Email);
        assert_eq!(CustomerField::Address.to_string(), "address");
        assert!("phone".parse::<CustomerField>().is_err());
    }
}
