//! File description of a document, as read by the CLI.
//!
//! Every value goes through the same validating setters as hand-built
//! documents, so a file cannot produce a document the builders would reject.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::document::{
    BuyCorrection, Buy, BuyRefund, Client, Company, Correction, CorrectionInfo, CorrectionType,
    FiscalDocument, Item, Operation, Payment, PaymentMethod, PaymentObject, PaymentType, Receipt,
    Sell, SellCorrection, SellRefund, Sno, Vat, VatType, DATE_FORMAT, TIMESTAMP_FORMAT,
};
use crate::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInput {
    pub external_id: String,
    /// `dd.mm.yyyy HH:MM:SS`; the caller supplies "now" when absent.
    pub timestamp: Option<String>,
    pub callback_url: Option<String>,
    pub client: Option<ClientInput>,
    pub company: CompanyInput,
    #[serde(default)]
    pub items: Vec<ItemInput>,
    #[serde(default)]
    pub payments: Vec<PaymentInput>,
    #[serde(default)]
    pub vats: Vec<VatInput>,
    pub total: Option<Decimal>,
    pub correction_info: Option<CorrectionInfoInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientInput {
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyInput {
    pub email: Option<String>,
    pub sno: Option<Sno>,
    pub inn: String,
    pub payment_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    pub name: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub sum: Decimal,
    pub measurement_unit: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_object: Option<PaymentObject>,
    pub vat: VatInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInput {
    #[serde(rename = "type")]
    pub payment_type: u8,
    pub sum: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VatInput {
    #[serde(rename = "type")]
    pub vat_type: VatType,
    pub sum: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorrectionInfoInput {
    #[serde(rename = "type")]
    pub correction_type: CorrectionType,
    /// `dd.mm.yyyy`
    pub base_date: String,
    pub base_number: String,
}

impl DocumentInput {
    /// Builds the document for `operation`, stamping `now` when the file has
    /// no timestamp.
    pub fn into_document(
        self,
        operation: Operation,
        now: NaiveDateTime,
    ) -> Result<Box<dyn FiscalDocument + Send + Sync>, ValidationError> {
        let timestamp = match &self.timestamp {
            Some(raw) => NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| {
                ValidationError::InvalidValue { field: "timestamp", reason: e.to_string() }
            })?,
            None => now,
        };

        let document: Box<dyn FiscalDocument + Send + Sync> = match operation {
            Operation::Sell => Box::new(Sell(self.into_receipt(timestamp)?)),
            Operation::SellRefund => Box::new(SellRefund(self.into_receipt(timestamp)?)),
            Operation::Buy => Box::new(Buy(self.into_receipt(timestamp)?)),
            Operation::BuyRefund => Box::new(BuyRefund(self.into_receipt(timestamp)?)),
            Operation::SellCorrection => Box::new(SellCorrection(self.into_correction(timestamp)?)),
            Operation::BuyCorrection => Box::new(BuyCorrection(self.into_correction(timestamp)?)),
        };
        Ok(document)
    }

    fn into_receipt(self, timestamp: NaiveDateTime) -> Result<Receipt, ValidationError> {
        let mut receipt = Receipt::new()
            .with_external_id(self.external_id)?
            .with_timestamp(timestamp)
            .with_company(build_company(self.company)?);
        if let Some(url) = self.callback_url {
            receipt = receipt.with_callback_url(url)?;
        }
        if let Some(client) = self.client {
            receipt = receipt.with_client(build_client(client)?);
        }
        for item in self.items {
            receipt = receipt.add_item(build_item(item)?);
        }
        for payment in self.payments {
            receipt = receipt.add_payment(build_payment(payment)?);
        }
        for vat in self.vats {
            receipt = receipt.add_vat(build_vat(vat)?);
        }
        if let Some(total) = self.total {
            receipt = receipt.with_total(total)?;
        }
        Ok(receipt)
    }

    fn into_correction(self, timestamp: NaiveDateTime) -> Result<Correction, ValidationError> {
        let mut correction = Correction::new()
            .with_external_id(self.external_id)?
            .with_timestamp(timestamp)
            .with_company(build_company(self.company)?);
        if let Some(url) = self.callback_url {
            correction = correction.with_callback_url(url)?;
        }
        if let Some(info) = self.correction_info {
            correction = correction.with_correction_info(build_correction_info(info)?);
        }
        for payment in self.payments {
            correction = correction.add_payment(build_payment(payment)?);
        }
        for vat in self.vats {
            correction = correction.add_vat(build_vat(vat)?);
        }
        Ok(correction)
    }
}

fn build_company(input: CompanyInput) -> Result<Company, ValidationError> {
    let mut company = Company::new()
        .with_inn(input.inn)?
        .with_payment_address(input.payment_address)?;
    if let Some(email) = input.email {
        company = company.with_email(email)?;
    }
    if let Some(sno) = input.sno {
        company = company.with_sno(sno);
    }
    Ok(company)
}

fn build_client(input: ClientInput) -> Result<Client, ValidationError> {
    let mut client = Client::new();
    if let Some(email) = input.email {
        client = client.with_email(email)?;
    }
    if let Some(phone) = input.phone {
        client = client.with_phone(phone)?;
    }
    Ok(client)
}

fn build_item(input: ItemInput) -> Result<Item, ValidationError> {
    let mut item = Item::new()
        .with_name(input.name)?
        .with_price(input.price)?
        .with_quantity(input.quantity)?
        .with_sum(input.sum)?
        .with_vat(build_vat(input.vat)?);
    if let Some(unit) = input.measurement_unit {
        item = item.with_measurement_unit(unit)?;
    }
    if let Some(method) = input.payment_method {
        item = item.with_payment_method(method);
    }
    if let Some(object) = input.payment_object {
        item = item.with_payment_object(object);
    }
    Ok(item)
}

fn build_payment(input: PaymentInput) -> Result<Payment, ValidationError> {
    Payment::new(PaymentType::from_code(input.payment_type)?, input.sum)
}

fn build_vat(input: VatInput) -> Result<Vat, ValidationError> {
    let vat = Vat::new(input.vat_type);
    match input.sum {
        Some(sum) => vat.with_sum(sum),
        None => Ok(vat),
    }
}

fn build_correction_info(input: CorrectionInfoInput) -> Result<CorrectionInfo, ValidationError> {
    let base_date = NaiveDate::parse_from_str(&input.base_date, DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidValue { field: "correction_info.base_date", reason: e.to_string() }
    })?;
    CorrectionInfo::new()
        .with_type(input.correction_type)
        .with_base_date(base_date)
        .with_base_number(input.base_number)
}
