//! Assembly of a display-ready invoice from a [`Configuration`].
//!
//! [`assemble`] is the only entry point the presentation layer needs. It never
//! fails: malformed dates resolve to the sentinel and missing quantities count
//! as zero, so there is always something to show.

use serde::Serialize;

use crate::dates::{self, ResolvedDate};
use crate::line_item::{self, LineItem};
use crate::model::{Configuration, PaymentInstruction};

/// A `Label: value` line, or a bare value when there is no label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledLine {
    pub label: Option<String>,
    pub value: String,
}

impl LabeledLine {
    /// Split on the first colon. A line without a colon, or with nothing after
    /// it, is kept whole as an unlabeled value.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.split_once(':') {
            Some((label, value)) if !value.trim().is_empty() => Self {
                label: Some(label.trim_end().to_string()),
                value: value.trim().to_string(),
            },
            _ => Self {
                label: None,
                value: line.to_string(),
            },
        }
    }
}

impl std::fmt::Display for LabeledLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{label}: {}", self.value),
            None => f.write_str(&self.value),
        }
    }
}

/// The issuing company: display name plus detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Issuer {
    pub name: String,
    pub details: Vec<LabeledLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInstruction {
    pub title: Option<String>,
    pub content: Vec<LabeledLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInvoice {
    pub invoice_number: u64,
    pub issuer: Issuer,
    pub billed_to: Vec<LabeledLine>,
    pub due_date: ResolvedDate,
    pub start_date: ResolvedDate,
    pub end_date: ResolvedDate,
    pub line_items: Vec<LineItem>,
    pub payment_instructions: Vec<ResolvedInstruction>,
}

impl ResolvedInvoice {
    pub fn grand_total(&self) -> f64 {
        self.line_items.iter().map(LineItem::subtotal).sum()
    }

    /// `Invoice #<number>`, used as the document title and header.
    pub fn document_title(&self) -> String {
        format!("Invoice #{}", self.invoice_number)
    }

    /// The invoice date shown in the header: the end of the billing period.
    pub fn issue_date_label(&self) -> Option<String> {
        display_label(&self.end_date)
    }

    pub fn due_date_label(&self) -> Option<String> {
        display_label(&self.due_date)
    }
}

fn display_label(date: &ResolvedDate) -> Option<String> {
    date.is_valid()
        .then(|| dates::format_display_date(date.day()))
}

pub fn assemble(config: &Configuration) -> ResolvedInvoice {
    let due_date = dates::resolve_date(config.due_date.as_deref());
    let start_date = dates::resolve_date(config.start_date.as_deref());
    let end_date = dates::resolve_date(config.end_date.as_deref());

    let line_items = config
        .payment_items
        .iter()
        .map(|item| line_item::resolve_line_item(item, &start_date, &end_date))
        .collect();

    ResolvedInvoice {
        invoice_number: config.invoice_number,
        issuer: resolve_issuer(&config.my_company),
        billed_to: labeled_lines(&config.invoiced_company),
        due_date,
        start_date,
        end_date,
        line_items,
        payment_instructions: config
            .payment_instructions
            .iter()
            .map(resolve_instruction)
            .collect(),
    }
}

fn resolve_issuer(lines: &[String]) -> Issuer {
    match lines.split_first() {
        Some((name, rest)) => Issuer {
            name: name.clone(),
            details: labeled_lines(rest),
        },
        None => Issuer::default(),
    }
}

fn resolve_instruction(instruction: &PaymentInstruction) -> ResolvedInstruction {
    ResolvedInstruction {
        title: instruction.title.clone().filter(|t| !t.is_empty()),
        content: labeled_lines(&instruction.content),
    }
}

fn labeled_lines(lines: &[String]) -> Vec<LabeledLine> {
    lines.iter().map(|l| LabeledLine::parse(l)).collect()
}
