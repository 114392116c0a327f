#[cfg(test)]
mod test {

    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::document::input::DocumentInput;
    use crate::document::{
        Buy, BuyCorrection, BuyRefund, Company, Correction, CorrectionInfo, CorrectionType,
        FiscalDocument, Operation, Payment, PaymentType, Receipt, SellCorrection, SellRefund, Sno,
        Vat, VatType,
    };
    use crate::error::ValidationError;
    use crate::tests::common::*;

    fn correction() -> Correction {
        Correction::new()
            .with_external_id("corr-1").unwrap()
            .with_timestamp(NaiveDate::from_ymd_opt(2025, 10, 2).unwrap().and_hms_opt(18, 0, 0).unwrap())
            .with_callback_url("https://shop.example.com/atol").unwrap()
            .with_company(
                Company::new()
                    .with_sno(Sno::Osn)
                    .with_inn("770000000012").unwrap()
                    .with_payment_address("Moscow, Tverskaya 1").unwrap(),
            )
            .with_correction_info(
                CorrectionInfo::new()
                    .with_type(CorrectionType::SelfInitiated)
                    .with_base_date(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap())
                    .with_base_number("1175").unwrap(),
            )
            .add_payment(Payment::new(PaymentType::CASH, dec("1000")).unwrap())
            .add_vat(Vat::new(VatType::Vat20).with_sum(dec("166.666")).unwrap())
    }

    #[test]
    fn sell_receipt_serializes_to_canonical_body() {
        let payload = sample_sell().serialize().unwrap();

        assert_eq!(payload.operation(), Operation::Sell);
        assert_eq!(
            Value::Object(payload.body().clone()),
            json!({
                "external_id": "order-17",
                "receipt": {
                    "client": { "email": "buyer@example.com" },
                    "company": {
                        "email": "shop@example.com",
                        "sno": "usn_income",
                        "inn": "7700000000",
                        "payment_address": "https://shop.example.com"
                    },
                    "items": [{
                        "name": "Coffee beans",
                        "price": 150.01,
                        "quantity": 1.0,
                        "sum": 150.01,
                        "payment_method": "full_payment",
                        "payment_object": "commodity",
                        "vat": { "type": "none" }
                    }],
                    "payments": [{ "type": 1, "sum": 150.01 }],
                    "total": 150.01
                },
                "timestamp": "01.10.2025 09:05:03"
            })
        );
    }

    #[test]
    fn key_order_is_stable() {
        let payload = sample_sell().serialize().unwrap();
        let keys: Vec<&str> = payload.body().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["external_id", "receipt", "timestamp"]);

        let receipt = payload.get("receipt").and_then(|r| r.as_object()).unwrap();
        let keys: Vec<&str> = receipt.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["client", "company", "items", "payments", "total"]);

        assert_eq!(payload.to_json(), sample_sell().serialize().unwrap().to_json());
    }

    #[test]
    fn every_variant_carries_its_fixed_operation() {
        let receipt = sample_receipt();
        assert_eq!(sample_sell().serialize().unwrap().operation(), Operation::Sell);
        assert_eq!(SellRefund(receipt.clone()).serialize().unwrap().operation(), Operation::SellRefund);
        assert_eq!(Buy(receipt.clone()).serialize().unwrap().operation(), Operation::Buy);
        assert_eq!(BuyRefund(receipt).serialize().unwrap().operation(), Operation::BuyRefund);
        assert_eq!(SellCorrection(correction()).serialize().unwrap().operation(), Operation::SellCorrection);
        assert_eq!(BuyCorrection(correction()).operation().as_str(), "buy_correction");
    }

    #[test]
    fn missing_required_fields_are_named() {
        let cases: Vec<(Receipt, &str)> = vec![
            (Receipt::new(), "external_id"),
            (sample_receipt().with_client(crate::document::Client::new()), "client.email|phone"),
            (
                Receipt::new()
                    .with_external_id("x").unwrap()
                    .with_timestamp(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()),
                "receipt.total",
            ),
            (sample_receipt().with_company(Company::new().with_sno(Sno::Osn)), "company.inn"),
            (sample_receipt().add_payment(Payment::default().with_type(PaymentType::CASH)), "payments.sum"),
        ];
        for (receipt, field) in cases {
            let err = SellRefund(receipt).serialize().unwrap_err();
            assert_eq!(err, ValidationError::MissingField(field));
        }
    }

    #[test]
    fn receipt_needs_items_and_payments() {
        let receipt = Receipt::new()
            .with_external_id("x").unwrap()
            .with_timestamp(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap())
            .with_client(crate::document::Client::new().with_phone("+79990000000").unwrap())
            .with_company(Company::new().with_inn("7700000000").unwrap().with_payment_address("a").unwrap())
            .with_total(dec("1")).unwrap();
        assert_eq!(Buy(receipt).serialize().unwrap_err(), ValidationError::MissingField("items"));
    }

    #[test]
    fn total_range_is_checked_on_set() {
        assert!(matches!(
            Receipt::new().with_total(dec("100000000.00")),
            Err(ValidationError::OutOfRange { field: "receipt.total", .. })
        ));
    }

    #[test]
    fn amounts_rounding_past_eight_digits_are_rejected_on_set() {
        assert!(matches!(
            Receipt::new().with_total(dec("99999999.995")),
            Err(ValidationError::OutOfRange { field: "receipt.total", .. })
        ));
        assert!(matches!(
            Payment::new(PaymentType::CASH, dec("99999999.995")),
            Err(ValidationError::OutOfRange { field: "payments.sum", .. })
        ));

        let body = sample_receipt().with_total(dec("99999999.994")).unwrap().to_body().unwrap();
        let total = body["receipt"]["total"].as_f64().unwrap();
        assert!(total <= 99_999_999.99, "serialized {}", total);
    }

    #[test]
    fn correction_serializes_with_service_block() {
        let payload = SellCorrection(correction()).serialize().unwrap();
        assert_eq!(
            Value::Object(payload.body().clone()),
            json!({
                "external_id": "corr-1",
                "correction": {
                    "company": { "sno": "osn", "inn": "770000000012", "payment_address": "Moscow, Tverskaya 1" },
                    "correction_info": { "type": "self", "base_date": "30.09.2025", "base_number": "1175" },
                    "payments": [{ "type": 0, "sum": 1000.0 }],
                    "vats": [{ "type": "vat20", "sum": 166.67 }]
                },
                "service": { "callback_url": "https://shop.example.com/atol" },
                "timestamp": "02.10.2025 18:00:00"
            })
        );
    }

    #[test]
    fn correction_requires_sno_and_info() {
        let no_sno = correction().with_company(
            Company::new().with_inn("7700000000").unwrap().with_payment_address("a").unwrap(),
        );
        assert_eq!(SellCorrection(no_sno).serialize().unwrap_err(), ValidationError::MissingField("company.sno"));

        let no_info = correction().with_correction_info(CorrectionInfo::new());
        assert_eq!(
            BuyCorrection(no_info).serialize().unwrap_err(),
            ValidationError::MissingField("correction_info.type")
        );
    }

    #[test]
    fn inn_must_be_10_or_12_digits() {
        assert!(Company::new().with_inn("123").is_err());
        assert!(Company::new().with_inn("77000000ab").is_err());
        assert!(Company::new().with_inn("7700000000").is_ok());
    }

    #[test]
    fn input_file_builds_the_same_receipt() {
        let yaml = r#"
external_id: order-17
timestamp: "01.10.2025 09:05:03"
client: { email: buyer@example.com }
company:
  email: shop@example.com
  sno: usn_income
  inn: "7700000000"
  payment_address: https://shop.example.com
items:
  - name: Coffee beans
    price: "150.005"
    quantity: 1
    sum: "150.005"
    payment_method: full_payment
    payment_object: commodity
    vat: { type: none }
payments:
  - { type: 1, sum: "150.005" }
total: "150.005"
"#;
        let input: DocumentInput = serde_yaml::from_str(yaml).unwrap();
        let now = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let document = input.into_document(Operation::Sell, now).unwrap();

        assert_eq!(document.serialize().unwrap(), sample_sell().serialize().unwrap());
    }

    #[test]
    fn input_file_correction_uses_now_when_timestamp_is_absent() {
        let yaml = r#"
external_id: corr-2
company: { sno: osn, inn: "7700000000", payment_address: shop }
correction_info: { type: instruction, base_date: "30.09.2025", base_number: "77" }
payments: [ { type: 9, sum: 10 } ]
vats: [ { type: vat10 } ]
"#;
        let input: DocumentInput = serde_yaml::from_str(yaml).unwrap();
        let now = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap().and_hms_opt(8, 30, 0).unwrap();
        let payload = input.into_document(Operation::BuyCorrection, now).unwrap().serialize().unwrap();

        assert_eq!(payload.operation(), Operation::BuyCorrection);
        assert_eq!(payload.get("timestamp"), Some(&json!("03.10.2025 08:30:00")));
        assert_eq!(payload.body()["correction"]["payments"], json!([{ "type": 9, "sum": 10.0 }]));
        assert_eq!(payload.body()["correction"]["correction_info"]["type"], json!("instruction"));
    }

    #[test]
    fn input_file_rejects_out_of_range_payment_type() {
        let yaml = r#"
external_id: x
company: { inn: "7700000000", payment_address: shop }
payments: [ { type: 12, sum: 1 } ]
"#;
        let input: DocumentInput = serde_yaml::from_str(yaml).unwrap();
        let now = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert!(matches!(
            input.into_document(Operation::Sell, now),
            Err(ValidationError::OutOfRange { field: "payments.type", .. })
        ));
    }
}
