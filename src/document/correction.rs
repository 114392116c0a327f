use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::document::item::serialize_vats;
use crate::document::payment::serialize_all;
use crate::document::receipt::MAX_EXTERNAL_ID_CHARS;
use crate::document::{
    format_date, format_timestamp, non_empty, required, service_block, Company, FiscalDocument,
    Operation, Payment, Vat,
};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionType {
    /// Correction on the seller's own initiative.
    #[serde(rename = "self")]
    SelfInitiated,
    /// Correction ordered by the tax authority.
    Instruction,
}

impl CorrectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionType::SelfInitiated => "self",
            CorrectionType::Instruction => "instruction",
        }
    }
}

/// Reason and base document of a correction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectionInfo {
    correction_type: Option<CorrectionType>,
    base_date: Option<NaiveDate>,
    base_number: Option<String>,
}

impl CorrectionInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, correction_type: CorrectionType) -> Self {
        self.correction_type = Some(correction_type);
        self
    }

    pub fn with_base_date(mut self, date: NaiveDate) -> Self {
        self.base_date = Some(date);
        self
    }

    pub fn with_base_number(mut self, number: impl Into<String>) -> Result<Self, ValidationError> {
        self.base_number = Some(non_empty("correction_info.base_number", number, 32)?);
        Ok(self)
    }

    pub fn serialize(&self) -> Result<Map<String, Value>, ValidationError> {
        let correction_type = required(&self.correction_type, "correction_info.type")?;
        let base_date = required(&self.base_date, "correction_info.base_date")?;
        let base_number = required(&self.base_number, "correction_info.base_number")?;

        let mut out = Map::new();
        out.insert("type".to_owned(), Value::from(correction_type.as_str()));
        out.insert("base_date".to_owned(), Value::from(format_date(base_date)));
        out.insert("base_number".to_owned(), Value::from(base_number.as_str()));
        Ok(out)
    }
}

/// Fields shared by sell and buy corrections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correction {
    external_id: Option<String>,
    timestamp: Option<NaiveDateTime>,
    callback_url: Option<String>,
    company: Company,
    correction_info: CorrectionInfo,
    payments: Vec<Payment>,
    vats: Vec<Vat>,
}

impl Correction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_external_id(mut self, id: impl Into<String>) -> Result<Self, ValidationError> {
        self.external_id = Some(non_empty("external_id", id, MAX_EXTERNAL_ID_CHARS)?);
        Ok(self)
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_callback_url(mut self, url: impl Into<String>) -> Result<Self, ValidationError> {
        self.callback_url = Some(non_empty("service.callback_url", url, 256)?);
        Ok(self)
    }

    pub fn with_company(mut self, company: Company) -> Self {
        self.company = company;
        self
    }

    pub fn with_correction_info(mut self, info: CorrectionInfo) -> Self {
        self.correction_info = info;
        self
    }

    pub fn add_payment(mut self, payment: Payment) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn add_vat(mut self, vat: Vat) -> Self {
        self.vats.push(vat);
        self
    }

    pub fn to_body(&self) -> Result<Map<String, Value>, ValidationError> {
        let external_id = required(&self.external_id, "external_id")?;
        let timestamp = required(&self.timestamp, "timestamp")?;
        // corrections must name the taxation system
        if self.company.sno().is_none() {
            return Err(ValidationError::MissingField("company.sno"));
        }
        if self.vats.is_empty() {
            return Err(ValidationError::MissingField("vats"));
        }

        let mut correction = Map::new();
        correction.insert("company".to_owned(), Value::Object(self.company.serialize()?));
        correction.insert("correction_info".to_owned(), Value::Object(self.correction_info.serialize()?));
        correction.insert("payments".to_owned(), serialize_all(&self.payments)?);
        correction.insert("vats".to_owned(), serialize_vats(&self.vats));

        let mut body = Map::new();
        body.insert("external_id".to_owned(), Value::from(external_id.as_str()));
        body.insert("correction".to_owned(), Value::Object(correction));
        if let Some(service) = service_block(&self.callback_url) {
            body.insert("service".to_owned(), service);
        }
        body.insert("timestamp".to_owned(), Value::from(format_timestamp(timestamp)));
        Ok(body)
    }
}

/// Correction of income.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SellCorrection(pub Correction);

/// Correction of expense.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuyCorrection(pub Correction);

impl FiscalDocument for SellCorrection {
    fn operation(&self) -> Operation {
        Operation::SellCorrection
    }

    fn body(&self) -> Result<Map<String, Value>, ValidationError> {
        self.0.to_body()
    }
}

impl FiscalDocument for BuyCorrection {
    fn operation(&self) -> Operation {
        Operation::BuyCorrection
    }

    fn body(&self) -> Result<Map<String, Value>, ValidationError> {
        self.0.to_body()
    }
}
