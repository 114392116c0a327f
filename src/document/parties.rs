use serde::Deserialize;
use serde_json::{Map, Value};

use crate::document::{non_empty, required};
use crate::error::ValidationError;

/// Taxation system of the seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sno {
    Osn,
    UsnIncome,
    UsnIncomeOutcome,
    Envd,
    Esn,
    Patent,
}

impl Sno {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sno::Osn => "osn",
            Sno::UsnIncome => "usn_income",
            Sno::UsnIncomeOutcome => "usn_income_outcome",
            Sno::Envd => "envd",
            Sno::Esn => "esn",
            Sno::Patent => "patent",
        }
    }
}

/// Seller block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Company {
    email: Option<String>,
    sno: Option<Sno>,
    inn: Option<String>,
    payment_address: Option<String>,
}

impl Company {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Result<Self, ValidationError> {
        self.email = Some(non_empty("company.email", email, 64)?);
        Ok(self)
    }

    pub fn with_sno(mut self, sno: Sno) -> Self {
        self.sno = Some(sno);
        self
    }

    /// Taxpayer number: 10 digits for organisations, 12 for individuals.
    pub fn with_inn(mut self, inn: impl Into<String>) -> Result<Self, ValidationError> {
        let inn = inn.into();
        if !matches!(inn.len(), 10 | 12) || !inn.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidValue {
                field: "company.inn",
                reason: format!("'{}' is not 10 or 12 digits", inn),
            });
        }
        self.inn = Some(inn);
        Ok(self)
    }

    pub fn with_payment_address(mut self, address: impl Into<String>) -> Result<Self, ValidationError> {
        self.payment_address = Some(non_empty("company.payment_address", address, 256)?);
        Ok(self)
    }

    pub fn sno(&self) -> Option<Sno> {
        self.sno
    }

    pub fn serialize(&self) -> Result<Map<String, Value>, ValidationError> {
        let inn = required(&self.inn, "company.inn")?;
        let payment_address = required(&self.payment_address, "company.payment_address")?;

        let mut out = Map::new();
        if let Some(email) = &self.email {
            out.insert("email".to_owned(), Value::from(email.as_str()));
        }
        if let Some(sno) = &self.sno {
            out.insert("sno".to_owned(), Value::from(sno.as_str()));
        }
        out.insert("inn".to_owned(), Value::from(inn.as_str()));
        out.insert("payment_address".to_owned(), Value::from(payment_address.as_str()));
        Ok(out)
    }
}

/// Buyer block. At least one contact is required on receipts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Client {
    email: Option<String>,
    phone: Option<String>,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Result<Self, ValidationError> {
        self.email = Some(non_empty("client.email", email, 64)?);
        Ok(self)
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Result<Self, ValidationError> {
        self.phone = Some(non_empty("client.phone", phone, 64)?);
        Ok(self)
    }

    pub fn serialize(&self) -> Result<Map<String, Value>, ValidationError> {
        if self.email.is_none() && self.phone.is_none() {
            return Err(ValidationError::MissingField("client.email|phone"));
        }
        let mut out = Map::new();
        if let Some(email) = &self.email {
            out.insert("email".to_owned(), Value::from(email.as_str()));
        }
        if let Some(phone) = &self.phone {
            out.insert("phone".to_owned(), Value::from(phone.as_str()));
        }
        Ok(out)
    }
}
