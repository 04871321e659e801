//! Presentation: the HTML document and the terminal preview.

use std::fs;
use std::path::Path;

use comfy_table::{Attribute, Cell, Table};
use serde::Serialize;
use slug::slugify;
use tera::{Context, Tera};

use crate::error::{Error, Result};
use crate::invoice::{LabeledLine, ResolvedInvoice};
use crate::line_item::{LineItem, QuantitySource};
use crate::money::format_money;

pub const TEMPLATE_NAME: &str = "invoice.html.tera";

// Embedded so a fresh data root always has a template to copy out.
const DEFAULT_TEMPLATE: &str = include_str!("../templates/invoice.html.tera");

#[derive(Debug, Serialize)]
pub struct InvoiceView {
    pub title: String,
    pub invoice_number: u64,
    pub issuer_name: String,
    pub issuer_details: Vec<LabeledLine>,
    pub billed_to: Vec<LabeledLine>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub items: Vec<ItemView>,
    pub total: String,
    pub instructions: Vec<InstructionView>,
}

#[derive(Debug, Serialize)]
pub struct ItemView {
    pub position: usize,
    pub title: String,
    pub unit_price: String,
    pub quantity: String,
    pub subtotal: String,
}

#[derive(Debug, Serialize)]
pub struct InstructionView {
    pub title: Option<String>,
    pub content: Vec<LabeledLine>,
}

impl InvoiceView {
    pub fn new(invoice: &ResolvedInvoice) -> Self {
        Self {
            title: invoice.document_title(),
            invoice_number: invoice.invoice_number,
            issuer_name: invoice.issuer.name.clone(),
            issuer_details: invoice.issuer.details.clone(),
            billed_to: invoice.billed_to.clone(),
            issue_date: invoice.issue_date_label(),
            due_date: invoice.due_date_label(),
            items: invoice
                .line_items
                .iter()
                .enumerate()
                .map(|(i, item)| ItemView::new(i + 1, item))
                .collect(),
            total: format_money(invoice.grand_total()),
            instructions: invoice
                .payment_instructions
                .iter()
                .map(|p| InstructionView {
                    title: p.title.clone(),
                    content: p.content.clone(),
                })
                .collect(),
        }
    }
}

impl ItemView {
    fn new(position: usize, item: &LineItem) -> Self {
        Self {
            position,
            title: item.title.clone(),
            unit_price: format_money(item.unit_price),
            quantity: quantity_text(item),
            subtotal: format_money(item.subtotal()),
        }
    }
}

/// Blank when no quantity was configured.
pub fn quantity_text(item: &LineItem) -> String {
    match item.source {
        QuantitySource::Unset => String::new(),
        _ => item.quantity.to_string(),
    }
}

/// Write the default template into `template_dir` unless one exists.
pub fn ensure_template(template_dir: &Path) -> Result<()> {
    let template_path = template_dir.join(TEMPLATE_NAME);
    if template_path.exists() {
        return Ok(());
    }
    fs::create_dir_all(template_dir).map_err(|e| Error::io(template_dir, e))?;
    tracing::info!(path = %template_path.display(), "initializing default template");
    fs::write(&template_path, DEFAULT_TEMPLATE).map_err(|e| Error::io(&template_path, e))
}

/// Templates from a user directory (`*.tera`), HTML-escaped.
pub fn load_templates(template_dir: &Path) -> Result<Tera> {
    let glob = template_dir.join("*.tera");
    let mut tera = Tera::new(&glob.to_string_lossy())?;
    tera.autoescape_on(vec![".html.tera", ".html"]);
    Ok(tera)
}

/// Only the embedded template.
pub fn builtin_templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, DEFAULT_TEMPLATE)?;
    tera.autoescape_on(vec![".html.tera", ".html"]);
    Ok(tera)
}

pub fn render_html(tera: &Tera, invoice: &ResolvedInvoice) -> Result<String> {
    let context = Context::from_serialize(InvoiceView::new(invoice))?;
    Ok(tera.render(TEMPLATE_NAME, &context)?)
}

/// `invoice-<number>-<issuer slug>.html`
pub fn output_file_name(invoice: &ResolvedInvoice) -> String {
    let slug = slugify(&invoice.issuer.name);
    if slug.is_empty() {
        format!("invoice-{}.html", invoice.invoice_number)
    } else {
        format!("invoice-{}-{}.html", invoice.invoice_number, slug)
    }
}

pub fn render_table(invoice: &ResolvedInvoice) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Item description"),
        Cell::new("Price"),
        Cell::new("Quantity"),
        Cell::new("Subtotal"),
    ]);

    for (i, item) in invoice.line_items.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&item.title),
            Cell::new(format_money(item.unit_price)),
            Cell::new(quantity_text(item)),
            Cell::new(format_money(item.subtotal())),
        ]);
    }

    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format_money(invoice.grand_total())).add_attribute(Attribute::Bold),
    ]);
    table
}
