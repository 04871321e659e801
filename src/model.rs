use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub invoice_number: u64,
    #[serde(default)]
    pub invoiced_company: Vec<String>,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// First entry is the display name, the rest are `Label: value` lines.
    #[serde(default)]
    pub my_company: Vec<String>,
    #[serde(default)]
    pub payment_items: Vec<PaymentItem>,
    #[serde(default)]
    pub payment_instructions: Vec<PaymentInstruction>,
}

/// A line-item template. `title` may embed `%dateRange%`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PaymentInstruction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Vec<String>,
}

// Dates are hand typed; a number or bool here should degrade to an invalid
// date rather than reject the whole document.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

impl Configuration {
    /// Parse configuration text (JSON).
    pub fn from_text(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_text(&self) -> String {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// The configuration used when nothing has been stored yet.
    pub fn sample() -> Self {
        let strings = |lines: &[&str]| lines.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            invoice_number: 1,
            invoiced_company: strings(&["Acme, Inc.", "invoices@acme.com"]),
            due_date: Some("2021-01-22".into()),
            start_date: Some("2021-01-01".into()),
            end_date: Some("2021-01-15".into()),
            my_company: strings(&[
                "My Tech Company Ltda",
                "CNPJ: 00.000.000/0000-00",
                "Avenida Dom Pedro II, 1234, Sala 123 B",
                "Florianópolis, SC, Brazil",
                "talkto@mytechcompany.com",
                "+55 48 999999999",
            ]),
            payment_items: vec![
                PaymentItem {
                    title: "Software Development %dateRange%".into(),
                    unit_price: 1.0,
                    quantity: None,
                },
                PaymentItem {
                    title: "Banking fee".into(),
                    unit_price: 20.0,
                    quantity: Some(1.0),
                },
            ],
            payment_instructions: vec![
                PaymentInstruction {
                    title: Some("Field 56A (Intermediary Bank)".into()),
                    content: strings(&[
                        "THE BANK OF NEW YORK MELLON",
                        "ADDRESS: 240 GREENWICH STREET NEW YORK, NY 10286",
                        "SWIFT CODE: IRVTUS3N",
                        "ROUTING NUMBER / ABA: 0210-0001-8",
                    ]),
                },
                PaymentInstruction {
                    title: Some("Field 57A (Final Bank)".into()),
                    content: strings(&[
                        "BANCO ABC S.A.",
                        "ADDRESS: Lorem Ipsum Dolor Sit Amet",
                        "SWIFT CODE: AAAAAAAA",
                        "ACCOUNT NUMBER: 999999999",
                    ]),
                },
                PaymentInstruction {
                    title: Some("Field 59 (Beneficiary)".into()),
                    content: strings(&[
                        "MY TECH COMPANY LTDA",
                        "IBAN: BR00 0000 0000 0000 0000 0000 000B 0",
                    ]),
                },
                PaymentInstruction {
                    title: Some("Field 70 (Reference)".into()),
                    content: strings(&["CNPJ: 00.000.000/0000-00"]),
                },
            ],
        }
    }
}
