//! Canned extraction results
//!
//! `mock_bill` is the bill served when the model's answer cannot be parsed and
//! mock fallback is enabled. `MockGateway` stands in for the real service in
//! tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use super::{BillExtractionGateway, ExtractionError, ReceiptImage};
use crate::models::{BillRecord, LineItem, Money};

/// The fixed demo receipt: five teas from an Indomaret in Garut
pub fn mock_bill() -> BillRecord {
    let items = LineItem::new("JAVANA TEH MLATI 350", 5.0, Money::new(3000.0))
        .map(|item| vec![item])
        .unwrap_or_default();

    BillRecord::new("INDOMARET KAB GARUT", items, Money::zero(), Money::zero())
        .unwrap_or_else(|_| unreachable!("mock bill amounts are valid"))
        .with_reported_total(Money::new(15000.0))
        .with_issued_at(
            NaiveDate::from_ymd_opt(2020, 11, 7),
            NaiveTime::from_hms_opt(15, 45, 0),
        )
}

/// Gateway that returns a preset result
pub struct MockGateway {
    result: Result<BillRecord, ExtractionError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockGateway {
    /// Always extracts `bill`
    pub fn succeeding(bill: BillRecord) -> Self {
        Self {
            result: Ok(bill),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always extracts the demo receipt
    pub fn demo() -> Self {
        Self::succeeding(mock_bill())
    }

    /// Always fails with `error`
    pub fn failing(error: ExtractionError) -> Self {
        Self {
            result: Err(error),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of extractions requested so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BillExtractionGateway for MockGateway {
    async fn extract(&self, _image: &ReceiptImage) -> Result<BillRecord, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::image::tests::png_bytes;

    #[test]
    fn test_mock_bill_matches_demo_receipt() {
        let bill = mock_bill();
        assert_eq!(bill.merchant_name(), "INDOMARET KAB GARUT");
        assert_eq!(bill.items().len(), 1);
        assert_eq!(bill.items()[0].name(), "JAVANA TEH MLATI 350");
        assert_eq!(bill.items()[0].unit_price(), Money::new(3000.0));
        assert_eq!(bill.total_amount(), Money::new(15000.0));
        assert_eq!(bill.reported_total_mismatch(), None);
    }

    #[tokio::test]
    async fn test_mock_gateway_counts_calls() {
        let image = ReceiptImage::from_bytes(png_bytes(), "struk.png").unwrap();
        let gateway = MockGateway::failing(ExtractionError::Timeout(30));

        assert_eq!(gateway.extract(&image).await, Err(ExtractionError::Timeout(30)));
        assert!(gateway.extract(&image).await.is_err());
        assert_eq!(gateway.calls(), 2);
    }
}
