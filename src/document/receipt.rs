use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::document::item::{serialize_items, serialize_vats};
use crate::document::payment::serialize_all;
use crate::document::{
    amount, format_timestamp, non_empty, required, service_block, Client, Company, FiscalDocument,
    Item, Operation, Payment, Vat,
};
use crate::error::ValidationError;

pub const MAX_EXTERNAL_ID_CHARS: usize = 128;

/// Fields shared by sell/buy receipts and their refunds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Receipt {
    external_id: Option<String>,
    timestamp: Option<NaiveDateTime>,
    callback_url: Option<String>,
    client: Client,
    company: Company,
    items: Vec<Item>,
    payments: Vec<Payment>,
    vats: Vec<Vat>,
    total: Option<Decimal>,
}

impl Receipt {
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

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_company(mut self, company: Company) -> Self {
        self.company = company;
        self
    }

    pub fn add_item(mut self, item: Item) -> Self {
        self.items.push(item);
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

    pub fn with_total(mut self, total: Decimal) -> Result<Self, ValidationError> {
        self.total = Some(amount::check_sum("receipt.total", total)?);
        Ok(self)
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn to_body(&self) -> Result<Map<String, Value>, ValidationError> {
        let external_id = required(&self.external_id, "external_id")?;
        let timestamp = required(&self.timestamp, "timestamp")?;
        let total = required(&self.total, "receipt.total")?;

        let mut receipt = Map::new();
        receipt.insert("client".to_owned(), Value::Object(self.client.serialize()?));
        receipt.insert("company".to_owned(), Value::Object(self.company.serialize()?));
        receipt.insert("items".to_owned(), serialize_items(&self.items)?);
        receipt.insert("payments".to_owned(), serialize_all(&self.payments)?);
        if !self.vats.is_empty() {
            receipt.insert("vats".to_owned(), serialize_vats(&self.vats));
        }
        receipt.insert("total".to_owned(), amount::money(*total));

        let mut body = Map::new();
        body.insert("external_id".to_owned(), Value::from(external_id.as_str()));
        body.insert("receipt".to_owned(), Value::Object(receipt));
        if let Some(service) = service_block(&self.callback_url) {
            body.insert("service".to_owned(), service);
        }
        body.insert("timestamp".to_owned(), Value::from(format_timestamp(timestamp)));
        Ok(body)
    }
}

macro_rules! receipt_document {
    ($(#[$meta:meta])* $name:ident => $operation:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name(pub Receipt);

        impl From<Receipt> for $name {
            fn from(receipt: Receipt) -> Self {
                Self(receipt)
            }
        }

        impl FiscalDocument for $name {
            fn operation(&self) -> Operation {
                $operation
            }

            fn body(&self) -> Result<Map<String, Value>, ValidationError> {
                self.0.to_body()
            }
        }
    };
}

receipt_document!(
    /// Income receipt.
    Sell => Operation::Sell
);
receipt_document!(
    /// Refund of an income receipt.
    SellRefund => Operation::SellRefund
);
receipt_document!(
    /// Expense receipt.
    Buy => Operation::Buy
);
receipt_document!(
    /// Refund of an expense receipt.
    BuyRefund => Operation::BuyRefund
);
