use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::document::amount::{self, MAX_ITEM_AMOUNT, MAX_QUANTITY, QUANTITY_SCALE};
use crate::document::{non_empty, required};
use crate::error::ValidationError;

pub const MAX_ITEM_NAME_CHARS: usize = 128;
pub const MAX_MEASUREMENT_UNIT_CHARS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatType {
    None,
    Vat0,
    Vat10,
    Vat18,
    Vat20,
    Vat110,
    Vat118,
    Vat120,
}

impl VatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VatType::None => "none",
            VatType::Vat0 => "vat0",
            VatType::Vat10 => "vat10",
            VatType::Vat18 => "vat18",
            VatType::Vat20 => "vat20",
            VatType::Vat110 => "vat110",
            VatType::Vat118 => "vat118",
            VatType::Vat120 => "vat120",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    FullPrepayment,
    Prepayment,
    Advance,
    FullPayment,
    PartialPayment,
    Credit,
    CreditPayment,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::FullPrepayment => "full_prepayment",
            PaymentMethod::Prepayment => "prepayment",
            PaymentMethod::Advance => "advance",
            PaymentMethod::FullPayment => "full_payment",
            PaymentMethod::PartialPayment => "partial_payment",
            PaymentMethod::Credit => "credit",
            PaymentMethod::CreditPayment => "credit_payment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentObject {
    Commodity,
    Excise,
    Job,
    Service,
    GamblingBet,
    GamblingPrize,
    Lottery,
    LotteryPrize,
    IntellectualActivity,
    Payment,
    AgentCommission,
    Composite,
    Another,
}

impl PaymentObject {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentObject::Commodity => "commodity",
            PaymentObject::Excise => "excise",
            PaymentObject::Job => "job",
            PaymentObject::Service => "service",
            PaymentObject::GamblingBet => "gambling_bet",
            PaymentObject::GamblingPrize => "gambling_prize",
            PaymentObject::Lottery => "lottery",
            PaymentObject::LotteryPrize => "lottery_prize",
            PaymentObject::IntellectualActivity => "intellectual_activity",
            PaymentObject::Payment => "payment",
            PaymentObject::AgentCommission => "agent_commission",
            PaymentObject::Composite => "composite",
            PaymentObject::Another => "another",
        }
    }
}

/// VAT line, attached to an item or to the whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct Vat {
    vat_type: VatType,
    sum: Option<Decimal>,
}

impl Vat {
    pub fn new(vat_type: VatType) -> Self {
        Self { vat_type, sum: None }
    }

    pub fn with_sum(mut self, sum: Decimal) -> Result<Self, ValidationError> {
        self.sum = Some(amount::check_sum("vats.sum", sum)?);
        Ok(self)
    }

    pub fn vat_type(&self) -> VatType {
        self.vat_type
    }

    pub fn serialize(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("type".to_owned(), Value::from(self.vat_type.as_str()));
        if let Some(sum) = self.sum {
            out.insert("sum".to_owned(), amount::money(sum));
        }
        out
    }
}

pub(crate) fn serialize_vats(vats: &[Vat]) -> Value {
    Value::Array(vats.iter().map(|v| Value::Object(v.serialize())).collect())
}

/// One position of a receipt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    name: Option<String>,
    price: Option<Decimal>,
    quantity: Option<Decimal>,
    sum: Option<Decimal>,
    measurement_unit: Option<String>,
    payment_method: Option<PaymentMethod>,
    payment_object: Option<PaymentObject>,
    vat: Option<Vat>,
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        self.name = Some(non_empty("items.name", name, MAX_ITEM_NAME_CHARS)?);
        Ok(self)
    }

    pub fn with_price(mut self, price: Decimal) -> Result<Self, ValidationError> {
        self.price = Some(amount::check_max("items.price", price, MAX_ITEM_AMOUNT)?);
        Ok(self)
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Result<Self, ValidationError> {
        self.quantity = Some(amount::check_max("items.quantity", quantity, MAX_QUANTITY)?);
        Ok(self)
    }

    pub fn with_sum(mut self, sum: Decimal) -> Result<Self, ValidationError> {
        self.sum = Some(amount::check_max("items.sum", sum, MAX_ITEM_AMOUNT)?);
        Ok(self)
    }

    pub fn with_measurement_unit(mut self, unit: impl Into<String>) -> Result<Self, ValidationError> {
        self.measurement_unit = Some(non_empty("items.measurement_unit", unit, MAX_MEASUREMENT_UNIT_CHARS)?);
        Ok(self)
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_payment_object(mut self, object: PaymentObject) -> Self {
        self.payment_object = Some(object);
        self
    }

    pub fn with_vat(mut self, vat: Vat) -> Self {
        self.vat = Some(vat);
        self
    }

    pub fn serialize(&self) -> Result<Map<String, Value>, ValidationError> {
        let name = required(&self.name, "items.name")?;
        let price = required(&self.price, "items.price")?;
        let quantity = required(&self.quantity, "items.quantity")?;
        let sum = required(&self.sum, "items.sum")?;
        let vat = required(&self.vat, "items.vat")?;

        let mut out = Map::new();
        out.insert("name".to_owned(), Value::from(name.as_str()));
        out.insert("price".to_owned(), amount::money(*price));
        out.insert("quantity".to_owned(), amount::to_json(*quantity, QUANTITY_SCALE));
        out.insert("sum".to_owned(), amount::money(*sum));
        if let Some(unit) = &self.measurement_unit {
            out.insert("measurement_unit".to_owned(), Value::from(unit.as_str()));
        }
        if let Some(method) = &self.payment_method {
            out.insert("payment_method".to_owned(), Value::from(method.as_str()));
        }
        if let Some(object) = &self.payment_object {
            out.insert("payment_object".to_owned(), Value::from(object.as_str()));
        }
        out.insert("vat".to_owned(), Value::Object(vat.serialize()));
        Ok(out)
    }
}

pub(crate) fn serialize_items(items: &[Item]) -> Result<Value, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::MissingField("items"));
    }
    items
        .iter()
        .map(|i| i.serialize().map(Value::Object))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
