use crate::dates::{self, ResolvedDate};
use crate::model::PaymentItem;

/// Replaced by the formatted billing period in item titles.
pub const DATE_RANGE_TOKEN: &str = "%dateRange%";

/// Hours billed per business day for period items.
pub const HOURS_PER_BUSINESS_DAY: u32 = 8;

/// Where a line item's quantity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantitySource {
    /// Business days in the billing period times [`HOURS_PER_BUSINESS_DAY`].
    BusinessDays { days: u32 },
    Configured,
    /// No quantity configured; counts as zero.
    Unset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub title: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub source: QuantitySource,
}

impl LineItem {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * self.quantity
    }
}

/// Expand a payment-item template against the billing period.
pub fn resolve_line_item(item: &PaymentItem, start: &ResolvedDate, end: &ResolvedDate) -> LineItem {
    let has_token = item.title.contains(DATE_RANGE_TOKEN);

    let title = if has_token {
        item.title
            .replace(DATE_RANGE_TOKEN, &dates::format_range(start.day(), end.day()))
    } else {
        item.title.clone()
    };

    let (quantity, source) = if has_token && start.is_valid() && end.is_valid() {
        let days = dates::count_business_days(start.day(), end.day());
        tracing::debug!(title = %item.title, days, "quantity from billing period");
        (
            f64::from(days * HOURS_PER_BUSINESS_DAY),
            QuantitySource::BusinessDays { days },
        )
    } else {
        match item.quantity {
            Some(q) => (q, QuantitySource::Configured),
            None => (0.0, QuantitySource::Unset),
        }
    };

    LineItem {
        title,
        unit_price: item.unit_price,
        quantity,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::resolve_date;

    fn item(title: &str, unit_price: f64, quantity: Option<f64>) -> PaymentItem {
        PaymentItem {
            title: title.into(),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn period_item_bills_eight_hours_per_business_day() {
        let start = resolve_date(Some("2021-01-01"));
        let end = resolve_date(Some("2021-01-15"));
        let line = resolve_line_item(&item("Software Development %dateRange%", 1.0, None), &start, &end);

        assert_eq!(line.title, "Software Development Jan 1–15, 2021");
        assert_eq!(line.source, QuantitySource::BusinessDays { days: 11 });
        assert_eq!(line.quantity, 88.0);
        assert_eq!(line.subtotal(), 88.0);
    }

    #[test]
    fn computed_quantity_overrides_configured_one() {
        let start = resolve_date(Some("2021-01-04"));
        let end = resolve_date(Some("2021-01-08"));
        let line = resolve_line_item(&item("Work %dateRange%", 50.0, Some(3.0)), &start, &end);

        assert_eq!(line.quantity, 40.0);
        assert_eq!(line.subtotal(), 2000.0);
    }

    #[test]
    fn plain_title_keeps_configured_quantity() {
        let invalid = resolve_date(Some("nope"));
        let valid = resolve_date(Some("2021-01-15"));
        let template = item("Banking fee", 20.0, Some(1.0));

        for (start, end) in [(valid, valid), (invalid, valid), (invalid, invalid)] {
            let line = resolve_line_item(&template, &start, &end);
            assert_eq!(line.title, "Banking fee");
            assert_eq!(line.quantity, 1.0);
            assert_eq!(line.source, QuantitySource::Configured);
            assert_eq!(line.subtotal(), 20.0);
        }
    }

    #[test]
    fn invalid_period_falls_back_to_configured_quantity() {
        let start = resolve_date(Some("garbage"));
        let end = resolve_date(Some("2021-01-15"));
        let line = resolve_line_item(&item("Dev %dateRange%", 10.0, Some(2.0)), &start, &end);

        // Formatting is still attempted with the sentinel.
        assert_eq!(line.title, "Dev Jan 1, 1970 – Jan 15, 2021");
        assert_eq!(line.quantity, 2.0);
        assert_eq!(line.source, QuantitySource::Configured);
    }

    #[test]
    fn unset_quantity_counts_as_zero() {
        let start = resolve_date(None);
        let end = resolve_date(None);
        let line = resolve_line_item(&item("Dev %dateRange%", 10.0, None), &start, &end);

        assert_eq!(line.source, QuantitySource::Unset);
        assert_eq!(line.quantity, 0.0);
        assert_eq!(line.subtotal(), 0.0);
    }

    #[test]
    fn every_token_is_replaced() {
        let start = resolve_date(Some("2021-02-01"));
        let end = resolve_date(Some("2021-02-01"));
        let line = resolve_line_item(&item("%dateRange% / %dateRange%", 1.0, None), &start, &end);

        assert_eq!(line.title, "Feb 1, 2021 / Feb 1, 2021");
        assert_eq!(line.quantity, 8.0);
    }

    #[test]
    fn reversed_period_bills_nothing() {
        let start = resolve_date(Some("2021-01-15"));
        let end = resolve_date(Some("2021-01-01"));
        let line = resolve_line_item(&item("Dev %dateRange%", 10.0, Some(5.0)), &start, &end);

        assert_eq!(line.source, QuantitySource::BusinessDays { days: 0 });
        assert_eq!(line.subtotal(), 0.0);
    }
}
