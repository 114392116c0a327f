use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::document::{amount, required};
use crate::error::ValidationError;

/// Payment type code as sent on the wire.
///
/// Codes 2..=9 double as vendor-extended payment types, so any code in
/// 0..=9 is accepted verbatim; the named constants are conveniences only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaymentType(u8);

impl PaymentType {
    pub const CASH: PaymentType = PaymentType(0);
    pub const ELECTRONIC: PaymentType = PaymentType(1);
    pub const PREPAYMENT: PaymentType = PaymentType(2);
    pub const CREDIT: PaymentType = PaymentType(3);
    pub const OTHER: PaymentType = PaymentType(4);

    pub const MAX_CODE: u8 = 9;
    pub const EXTENDED_MIN: u8 = 2;

    pub fn from_code(code: u8) -> Result<Self, ValidationError> {
        if code > Self::MAX_CODE {
            return Err(ValidationError::OutOfRange {
                field: "payments.type",
                value: code.to_string(),
                min: "0".to_owned(),
                max: Self::MAX_CODE.to_string(),
            });
        }
        Ok(PaymentType(code))
    }

    /// Vendor-extended type slot, codes 2..=9.
    pub fn extended(code: u8) -> Result<Self, ValidationError> {
        if !(Self::EXTENDED_MIN..=Self::MAX_CODE).contains(&code) {
            return Err(ValidationError::OutOfRange {
                field: "payments.type",
                value: code.to_string(),
                min: Self::EXTENDED_MIN.to_string(),
                max: Self::MAX_CODE.to_string(),
            });
        }
        Ok(PaymentType(code))
    }

    pub fn code(&self) -> u8 {
        self.0
    }
}

/// One payment line of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payment {
    payment_type: Option<PaymentType>,
    sum: Option<Decimal>,
}

impl Payment {
    pub fn new(payment_type: PaymentType, sum: Decimal) -> Result<Self, ValidationError> {
        Payment::default().with_type(payment_type).with_sum(sum)
    }

    pub fn with_type(mut self, payment_type: PaymentType) -> Self {
        self.payment_type = Some(payment_type);
        self
    }

    /// Fails when the rounded integer part exceeds 8 digits or the sum is negative.
    pub fn with_sum(mut self, sum: Decimal) -> Result<Self, ValidationError> {
        self.sum = Some(amount::check_sum("payments.sum", sum)?);
        Ok(self)
    }

    pub fn payment_type(&self) -> Option<PaymentType> {
        self.payment_type
    }

    pub fn sum(&self) -> Option<Decimal> {
        self.sum
    }

    pub fn serialize(&self) -> Result<Map<String, Value>, ValidationError> {
        let payment_type = required(&self.payment_type, "payments.type")?;
        let sum = required(&self.sum, "payments.sum")?;

        let mut out = Map::new();
        out.insert("type".to_owned(), Value::from(payment_type.code()));
        out.insert("sum".to_owned(), amount::money(*sum));
        Ok(out)
    }
}

pub(crate) fn serialize_all(payments: &[Payment]) -> Result<Value, ValidationError> {
    if payments.is_empty() {
        return Err(ValidationError::MissingField("payments"));
    }
    payments
        .iter()
        .map(|p| p.serialize().map(Value::Object))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
