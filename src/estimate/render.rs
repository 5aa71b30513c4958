use std::fmt::Write;

use crate::error::ConfiguratorError;

use super::document::EstimateDocument;
use super::format::format_rate;

pub const DISCLAIMER: &str =
    "This is a system-generated estimate. Please contact us for an official estimate.";

/// Trait for turning an issued estimate into a downloadable artifact.
/// Implementations must not alter any amounts; they only lay them out.
pub trait EstimateRenderer: Send + Sync {
    /// Short renderer name (lowercase).
    fn name(&self) -> &str;

    /// File extension of the produced artifact, without the dot.
    fn extension(&self) -> &str;

    /// Render the document to bytes.
    fn render(&self, document: &EstimateDocument) -> Result<Vec<u8>, ConfiguratorError>;

    /// File name to offer for download.
    fn file_name(&self, document: &EstimateDocument) -> String {
        document.file_name_with_extension(self.extension())
    }
}

/// Plain-text quotation, suitable for printing or attaching to an email.
pub struct TextRenderer {
    pub company: String,
    pub tagline: String,
    pub notes: Vec<String>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            company: "Mobile DVR Solutions".to_string(),
            tagline: "Professional Vehicle Surveillance Systems".to_string(),
            notes: vec![
                "50% advance payment is required. Delivery will be made within 4 weeks of receiving the advance payment.".to_string(),
                "The monthly subscription fee will be Rs 1,500.00 per vehicle, including VAT and other applicable charges. (The data SIM card should be provided by the customer)".to_string(),
                "Transportation charges will apply for installations conducted outside our workshop.".to_string(),
                "All devices come with a one (1) year warranty period from the date of installation.".to_string(),
            ],
        }
    }
}

const ITEM_WIDTH: usize = 40;
const AMOUNT_WIDTH: usize = 18;

impl TextRenderer {
    fn row(out: &mut String, item: &str, quantity: u32, rate: &str, amount: &str) -> std::fmt::Result {
        writeln!(
            out,
            "{:<iw$} {:>6} {:>aw$} {:>aw$}",
            truncate(item, ITEM_WIDTH),
            format!("{}.00", quantity),
            rate,
            amount,
            iw = ITEM_WIDTH,
            aw = AMOUNT_WIDTH
        )
    }

    fn total(out: &mut String, label: &str, amount: &str) -> std::fmt::Result {
        writeln!(out, "{:>w$} {:>aw$}", label, amount, w = ITEM_WIDTH + 8 + AMOUNT_WIDTH, aw = AMOUNT_WIDTH)
    }

    fn write_document(&self, out: &mut String, doc: &EstimateDocument) -> std::fmt::Result {
        let estimate = &doc.estimate;
        let rule = "-".repeat(ITEM_WIDTH + 9 + 2 * AMOUNT_WIDTH);

        writeln!(out, "{}", self.company)?;
        writeln!(out, "{}", self.tagline)?;
        writeln!(out)?;
        writeln!(out, "ESTIMATE # {}", doc.number)?;
        writeln!(out, "Estimate Date: {}", doc.issue_date_display())?;
        writeln!(out, "Expiry Date:   {}", doc.valid_until_display())?;
        writeln!(out)?;
        writeln!(out, "*** {} ***", DISCLAIMER)?;
        writeln!(out)?;

        writeln!(
            out,
            "{:<iw$} {:>6} {:>aw$} {:>aw$}",
            "Item & Description",
            "Qty",
            "Rate",
            "Amount",
            iw = ITEM_WIDTH,
            aw = AMOUNT_WIDTH
        )?;
        writeln!(out, "{}", rule)?;

        let system_price = doc.price(estimate.system_price);
        Self::row(out, &estimate.system_name, 1, &system_price, &system_price)?;
        for line in &estimate.lines {
            Self::row(
                out,
                &line.name,
                line.quantity,
                &doc.price(line.unit_price),
                &doc.price(line.line_total),
            )?;
        }
        let fee = doc.price(estimate.installation_fee);
        Self::row(out, "Installation Fee", 1, &fee, &fee)?;
        writeln!(out, "{}", rule)?;

        Self::total(out, "Sub Total", &doc.price(estimate.subtotal))?;
        let service_label = format!("SSCL ({})", format_rate(estimate.service_charge_rate));
        Self::total(out, &service_label, &doc.price(estimate.service_charge))?;
        let tax_label = format!("VAT ({})", format_rate(estimate.tax_rate));
        Self::total(out, &tax_label, &doc.price(estimate.tax))?;
        Self::total(out, "Total", &doc.price(estimate.total))?;

        if !self.notes.is_empty() {
            writeln!(out)?;
            writeln!(out, "Notes:")?;
            for (i, note) in self.notes.iter().enumerate() {
                writeln!(out, "{}. {}", i + 1, note)?;
            }
        }
        Ok(())
    }
}

impl EstimateRenderer for TextRenderer {
    fn name(&self) -> &str {
        "text"
    }

    fn extension(&self) -> &str {
        "txt"
    }

    fn render(&self, document: &EstimateDocument) -> Result<Vec<u8>, ConfiguratorError> {
        let mut out = String::new();
        self.write_document(&mut out, document)
            .map_err(|e| ConfiguratorError::Render(e.to_string()))?;
        Ok(out.into_bytes())
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::configuration::LineItem;
    use crate::estimate::{compute_estimate, compute_estimate_with, PricingPolicy};
    use crate::settings::EstimateSettings;
    use rust_decimal::Decimal;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn document() -> EstimateDocument {
        let catalog = default_catalog();
        let items = vec![LineItem {
            product: catalog.get("kingston-128gb-microsd").unwrap().clone(),
            quantity: 2,
        }];
        let estimate = compute_estimate(catalog.get("c6d-ai-basic").unwrap(), &items);
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        EstimateDocument::issue(estimate, today, &mut rng, &EstimateSettings::default())
    }

    #[test]
    fn test_text_render_contents() {
        let doc = document();
        let bytes = TextRenderer::default().render(&doc).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains(&doc.number));
        assert!(text.contains(DISCLAIMER));
        assert!(text.contains("Estimate Date: 19 Oct 2026"));
        assert!(text.contains("Expiry Date:   18 Nov 2026"));
        // 45,000 + 2 x 3,500 + 4,500 = 56,500
        assert!(text.contains("Rs. 56,500.00"), "subtotal missing:\n{}", text);
        assert!(text.contains("Rs. 7,000.00"));
        assert!(text.contains("Installation Fee"));
        assert!(text.contains(&doc.price(doc.estimate.total)));
    }

    #[test]
    fn test_levy_labels_follow_policy() {
        let default_text =
            String::from_utf8(TextRenderer::default().render(&document()).unwrap()).unwrap();
        assert!(default_text.contains("SSCL (2.5%)"));
        assert!(default_text.contains("VAT (18%)"));

        let catalog = default_catalog();
        let policy = PricingPolicy {
            service_charge_rate: Decimal::new(3, 2),
            tax_rate: Decimal::new(15, 2),
            ..PricingPolicy::default()
        };
        let estimate = compute_estimate_with(&policy, catalog.get("x3n-ai-premium").unwrap(), &[]);
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let doc = EstimateDocument::issue(estimate, today, &mut rng, &EstimateSettings::default());

        let text = String::from_utf8(TextRenderer::default().render(&doc).unwrap()).unwrap();
        let tax_line = text.lines().find(|l| l.contains("VAT (")).unwrap();
        assert!(tax_line.contains("VAT (15%)"), "wrong tax label: {}", tax_line);
        assert!(tax_line.contains(&doc.price(doc.estimate.tax)));
        assert!(text.contains("SSCL (3%)"), "wrong service charge label:\n{}", text);
        assert!(!text.contains("VAT (18%)"));
    }

    #[test]
    fn test_file_name_uses_extension() {
        let doc = document();
        let renderer = TextRenderer::default();
        assert_eq!(renderer.file_name(&doc), format!("{}.txt", doc.number));
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long product name", 10), "a very ...");
    }
}
