use anyhow::{Context, Result};
use askama::Template;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

use crate::format::format_money;
use crate::models::dates::format_br;
use crate::models::{CompanyProfile, Quote};

const FALLBACK_COMPANY_NAME: &str = "Sua Empresa de Marcenaria";

struct DocumentLineItem {
    name: String,
    unit: String,
    quantity: String,
    unit_price: String,
    total: String,
}

/// Printable quote handed to the client. The margin and the materials subtotal
/// stay internal.
#[derive(Template)]
#[template(path = "quote_document.html")]
struct QuoteDocumentTemplate {
    company_name: String,
    owner_name: String,
    tax_id: String,
    phone: String,
    logo: String,
    title: String,
    date: String,
    line_items: Vec<DocumentLineItem>,
    general_total: String,
    installment_total: Option<String>,
    has_exclusions: bool,
    exclusions: Vec<String>,
}

impl QuoteDocumentTemplate {
    fn new(quote: &Quote, company: &CompanyProfile) -> Self {
        let company_name = if company.name.trim().is_empty() {
            FALLBACK_COMPANY_NAME.to_string()
        } else {
            company.name.clone()
        };

        let line_items = quote
            .line_items
            .iter()
            .map(|item| DocumentLineItem {
                name: item.name.clone(),
                unit: item.unit.to_string(),
                quantity: item.quantity.to_string(),
                unit_price: format_money(item.unit_price),
                total: format_money(item.total),
            })
            .collect();

        let exclusions = quote
            .exclusions
            .active()
            .map(|e| e.document_label().to_string())
            .chain(quote.custom_exclusions.iter().cloned())
            .collect();

        Self {
            company_name,
            owner_name: company.owner_name.clone(),
            tax_id: company.tax_id.clone(),
            phone: company.phone.clone(),
            logo: company.logo.clone(),
            title: quote.title.clone(),
            date: format_br(quote.created_on),
            line_items,
            general_total: format_money(quote.totals.general_total),
            installment_total: quote
                .surcharge_enabled
                .then(|| format_money(quote.totals.installment_total)),
            has_exclusions: quote.has_exclusions(),
            exclusions,
        }
    }
}

/// Render the self-contained HTML document for a quote.
pub fn render_quote_document(quote: &Quote, company: &CompanyProfile) -> Result<String> {
    QuoteDocumentTemplate::new(quote, company)
        .render()
        .context("could not render quote document")
}

/// Writes quote documents to disk and hands them to the configured print command
pub struct QuoteDocumentGenerator {
    output_dir: PathBuf,
    print_command: Option<String>,
}

impl QuoteDocumentGenerator {
    pub fn new(output_dir: impl AsRef<Path>, print_command: Option<String>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            print_command: print_command.filter(|c| !c.trim().is_empty()),
        }
    }

    /// Write `orcamento_<id>.html` and launch the print command on it, if any.
    /// A failed print command does not fail the generation.
    pub fn generate(&self, quote: &Quote, company: &CompanyProfile) -> Result<PathBuf> {
        let html = render_quote_document(quote, company)?;

        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir).with_context(|| {
                format!("could not create output directory {}", self.output_dir.display())
            })?;
        }

        let path = self.output_dir.join(format!("orcamento_{}.html", quote.id));
        fs::write(&path, html).with_context(|| format!("could not write {}", path.display()))?;
        info!(path = %path.display(), "quote document written");

        if let Some(command) = &self.print_command {
            self.print(command, &path);
        }

        Ok(path)
    }

    fn print(&self, command: &str, path: &Path) {
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return;
        };

        match Command::new(program).args(parts).arg(path).output() {
            Ok(output) if output.status.success() => {
                info!(command, "quote document sent to print command");
            }
            Ok(output) => {
                let error = String::from_utf8_lossy(&output.stderr);
                warn!(command, error = %error.trim(), "print command failed");
            }
            Err(e) => {
                warn!(command, error = %e, "could not run print command");
            }
        }
    }
}
