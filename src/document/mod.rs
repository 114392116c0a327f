//! # Fiscal documents
//!
//! Typed builders for every operation the registration service accepts.
//! Range checks run when a value is set; required fields are checked and
//! amounts rounded when the document is serialized.
//!
//! Modules:
//! - `amount`: range checks and rounding of money and quantities
//! - `payment`: payment lines
//! - `item`: receipt positions and VAT lines
//! - `parties`: company (seller) and client (buyer) blocks
//! - `receipt`: sell/buy receipts and their refunds
//! - `correction`: correction documents
//! - `input`: file format used by the CLI to describe a document

pub mod amount;
pub mod correction;
pub mod input;
pub mod item;
pub mod parties;
pub mod payment;
pub mod receipt;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ValidationError;

pub use correction::{BuyCorrection, Correction, CorrectionInfo, CorrectionType, SellCorrection};
pub use item::{Item, PaymentMethod, PaymentObject, Vat, VatType};
pub use parties::{Client, Company, Sno};
pub use payment::{Payment, PaymentType};
pub use receipt::{Buy, BuyRefund, Receipt, Sell, SellRefund};

/// Wire format of document timestamps.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
/// Wire format of plain dates (correction base date).
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Operation tag, also the last segment of the submission path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Sell,
    SellRefund,
    SellCorrection,
    Buy,
    BuyRefund,
    BuyCorrection,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Sell => "sell",
            Operation::SellRefund => "sell_refund",
            Operation::SellCorrection => "sell_correction",
            Operation::Buy => "buy",
            Operation::BuyRefund => "buy_refund",
            Operation::BuyCorrection => "buy_correction",
        }
    }

    pub fn is_correction(&self) -> bool {
        matches!(self, Operation::SellCorrection | Operation::BuyCorrection)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sell" => Ok(Operation::Sell),
            "sell_refund" => Ok(Operation::SellRefund),
            "sell_correction" => Ok(Operation::SellCorrection),
            "buy" => Ok(Operation::Buy),
            "buy_refund" => Ok(Operation::BuyRefund),
            "buy_correction" => Ok(Operation::BuyCorrection),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

/// Serialized document: the operation tag plus the canonical request body.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    operation: Operation,
    body: Map<String, Value>,
}

impl Payload {
    pub fn new(operation: Operation, body: Map<String, Value>) -> Self {
        Self { operation, body }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.body.clone()).to_string()
    }
}

/// A document that can be submitted for registration.
///
/// The operation tag is fixed by the implementing type.
pub trait FiscalDocument {
    fn operation(&self) -> Operation;

    /// Validated request body, keys in canonical order.
    fn body(&self) -> Result<Map<String, Value>, ValidationError>;

    fn serialize(&self) -> Result<Payload, ValidationError> {
        Ok(Payload::new(self.operation(), self.body()?))
    }
}

pub(crate) fn required<'a, T>(value: &'a Option<T>, field: &'static str) -> Result<&'a T, ValidationError> {
    value.as_ref().ok_or(ValidationError::MissingField(field))
}

pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Builds the `service` block shared by receipts and corrections.
pub(crate) fn service_block(callback_url: &Option<String>) -> Option<Value> {
    callback_url.as_ref().map(|url| {
        let mut service = Map::new();
        service.insert("callback_url".to_owned(), Value::from(url.as_str()));
        Value::Object(service)
    })
}

pub(crate) fn non_empty(field: &'static str, value: impl Into<String>, max_chars: usize) -> Result<String, ValidationError> {
    let value = value.into();
    let len = value.chars().count();
    if len == 0 {
        return Err(ValidationError::InvalidValue { field, reason: "must not be empty".to_owned() });
    }
    if len > max_chars {
        return Err(ValidationError::InvalidValue {
            field,
            reason: format!("longer than {} characters", max_chars),
        });
    }
    Ok(value)
}
