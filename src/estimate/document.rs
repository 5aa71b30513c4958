use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::Serialize;

use crate::settings::EstimateSettings;

use super::calculator::Estimate;
use super::format::{format_date, format_price};

/// An issued estimate: the pricing breakdown plus quote number and dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateDocument {
    /// Quote number, e.g. `EST-MobileDVR20261019042`
    pub number: String,
    pub issue_date: NaiveDate,
    pub valid_until: NaiveDate,
    pub currency_label: String,
    pub estimate: Estimate,
}

impl EstimateDocument {
    /// Issue a document for `estimate` dated `today`.
    ///
    /// The 3-digit suffix is random, so two documents issued on the same day
    /// may share a number. It is a reference for humans, not a key.
    pub fn issue<R: Rng + ?Sized>(
        estimate: Estimate,
        today: NaiveDate,
        rng: &mut R,
        settings: &EstimateSettings,
    ) -> Self {
        let suffix: u16 = rng.random_range(0..1000);
        let number = format!(
            "{}{}{:03}",
            settings.number_prefix,
            today.format("%Y%m%d"),
            suffix
        );
        let valid_until = today
            .checked_add_days(Days::new(settings.validity_days))
            .unwrap_or(NaiveDate::MAX);

        Self {
            number,
            issue_date: today,
            valid_until,
            currency_label: settings.currency_label.clone(),
            estimate,
        }
    }

    /// Download file name, `<number>.pdf`.
    pub fn file_name(&self) -> String {
        self.file_name_with_extension("pdf")
    }

    pub fn file_name_with_extension(&self, extension: &str) -> String {
        format!("{}.{}", self.number, extension)
    }

    pub fn price(&self, amount: rust_decimal::Decimal) -> String {
        format_price(amount, &self.currency_label)
    }

    pub fn issue_date_display(&self) -> String {
        format_date(self.issue_date)
    }

    pub fn valid_until_display(&self) -> String {
        format_date(self.valid_until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::estimate::compute_estimate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn document(today: NaiveDate, seed: u64) -> EstimateDocument {
        let catalog = default_catalog();
        let estimate = compute_estimate(catalog.get("f6n-mobile-dvr").unwrap(), &[]);
        let mut rng = StdRng::seed_from_u64(seed);
        EstimateDocument::issue(estimate, today, &mut rng, &EstimateSettings::default())
    }

    #[test]
    fn test_number_format() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        for seed in 0..20 {
            let doc = document(today, seed);
            assert!(doc.number.starts_with("EST-MobileDVR20261019"), "got {}", doc.number);
            let suffix = &doc.number["EST-MobileDVR20261019".len()..];
            assert_eq!(suffix.len(), 3, "suffix must be zero padded: {}", doc.number);
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_validity_crosses_month_end() {
        let today = NaiveDate::from_ymd_opt(2026, 12, 15).unwrap();
        let doc = document(today, 7);
        assert_eq!(doc.valid_until, NaiveDate::from_ymd_opt(2027, 1, 14).unwrap());
        assert_eq!(doc.valid_until_display(), "14 Jan 2027");
        assert_eq!(doc.issue_date_display(), "15 Dec 2026");
    }

    #[test]
    fn test_file_name() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let doc = document(today, 1);
        assert_eq!(doc.file_name(), format!("{}.pdf", doc.number));
        assert_eq!(doc.file_name_with_extension("txt"), format!("{}.txt", doc.number));
    }

    #[test]
    fn test_price_uses_currency_label() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let doc = document(today, 1);
        assert_eq!(doc.price(doc.estimate.system_price), "Rs. 98,000.00");
    }
}
