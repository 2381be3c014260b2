//! End-to-end wizard sessions against a mock extraction gateway

use std::sync::Arc;
use std::time::Duration;

use patungan::gateway::{ExtractionError, MockGateway, ReceiptImage};
use patungan::models::{BillRecord, LineItem, Money, SplitMethod};
use patungan::wizard::{Step, WizardController};
use patungan::PatunganError;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn receipt() -> ReceiptImage {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.extend_from_slice(b"\0\0\0\rIHDR");
    ReceiptImage::from_bytes(bytes, "receipt.png").unwrap()
}

fn dinner_bill() -> BillRecord {
    let items = vec![
        LineItem::new("Nasi Goreng", 2.0, Money::new(25000.0)).unwrap(),
        LineItem::new("Es Teh", 3.0, Money::new(5000.0)).unwrap(),
        LineItem::new("Kerupuk", 1.0, Money::new(3000.0)).unwrap(),
    ];
    BillRecord::new("Warung Bu Sri", items, Money::new(6800.0), Money::new(3400.0)).unwrap()
}

fn wizard(gateway: MockGateway) -> WizardController {
    WizardController::new(Arc::new(gateway), Duration::from_secs(30))
}

#[tokio::test]
async fn even_split_from_receipt_to_result() {
    let mut wizard = wizard(MockGateway::demo());

    assert_eq!(wizard.submit_receipt(&receipt()).await.unwrap(), Step::Edit);
    assert_eq!(wizard.next().unwrap(), Step::Friends);

    wizard.add_participant("Budi").unwrap();
    wizard.add_participant("Citra").unwrap();
    assert_eq!(wizard.next().unwrap(), Step::Split);

    wizard.choose_split_method(SplitMethod::Even).unwrap();
    assert_eq!(wizard.next().unwrap(), Step::Result);

    let outcome = wizard.state().outcome();
    assert_eq!(outcome.results.len(), 3);
    for name in ["Me", "Budi", "Citra"] {
        assert_eq!(outcome.results.get(name), Some(Money::new(5000.0)));
    }
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn per_item_split_reports_unassigned_items() {
    let mut wizard = wizard(MockGateway::succeeding(dinner_bill()));
    wizard.submit_receipt(&receipt()).await.unwrap();
    wizard.next().unwrap();

    wizard.rename_participant(0, "Ayu").unwrap();
    wizard.add_participant("Budi").unwrap();
    wizard.next().unwrap();

    let ids: Vec<_> = wizard
        .state()
        .bill()
        .unwrap()
        .items()
        .iter()
        .map(|item| item.id())
        .collect();
    wizard.choose_split_method(SplitMethod::PerItem).unwrap();
    wizard.set_payers(ids[0], &["Ayu", "Budi"]).unwrap();
    wizard.toggle_payer(ids[1], "Budi").unwrap();
    assert_eq!(wizard.unassigned_items().len(), 1);

    wizard.next().unwrap();
    let outcome = wizard.state().outcome();
    assert_eq!(outcome.results.get("Ayu"), Some(Money::new(25000.0)));
    assert_eq!(outcome.results.get("Budi"), Some(Money::new(40000.0)));

    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].item_name, "Kerupuk");
    assert_eq!(outcome.warnings[0].amount, Money::new(3000.0));
}

#[tokio::test]
async fn going_back_keeps_edits_and_recomputes() {
    let mut wizard = wizard(MockGateway::succeeding(dinner_bill()));
    wizard.submit_receipt(&receipt()).await.unwrap();
    wizard.next().unwrap();
    wizard.add_participant("Budi").unwrap();
    wizard.next().unwrap();
    wizard.choose_split_method(SplitMethod::Even).unwrap();
    wizard.next().unwrap();
    assert_eq!(
        wizard.state().outcome().results.get("Budi"),
        Some(Money::new(39100.0))
    );

    assert_eq!(wizard.back().unwrap(), Step::Split);
    assert_eq!(wizard.back().unwrap(), Step::Friends);
    assert_eq!(wizard.back().unwrap(), Step::Edit);
    wizard.set_service_charge(Money::zero()).unwrap();
    wizard.set_tax_amount(Money::zero()).unwrap();

    // Steps left behind must be passed again
    assert!(!wizard.state().is_completed(Step::Friends));
    wizard.next().unwrap();
    wizard.next().unwrap();
    assert_eq!(wizard.state().split_method(), Some(SplitMethod::Even));
    wizard.next().unwrap();

    assert_eq!(
        wizard.state().outcome().results.get("Budi"),
        Some(Money::new(34000.0))
    );
    assert_eq!(wizard.state().participants().len(), 2);
}

#[tokio::test]
async fn blocked_transitions_leave_the_state_alone() {
    let mut wizard = wizard(MockGateway::demo());

    let err = wizard.next().unwrap_err();
    assert!(err.is_invalid_transition());
    assert_eq!(wizard.step(), Step::Upload);
    assert!(wizard.back().unwrap_err().is_invalid_transition());

    wizard.submit_receipt(&receipt()).await.unwrap();
    wizard.next().unwrap();
    wizard.remove_participant(0).unwrap();
    assert!(wizard.next().unwrap_err().is_invalid_transition());
    assert_eq!(wizard.step(), Step::Friends);

    wizard.add_participant("Budi").unwrap();
    wizard.next().unwrap();
    assert!(wizard.next().unwrap_err().is_invalid_transition());
    assert_eq!(wizard.step(), Step::Split);
}

#[tokio::test]
async fn extraction_failures_stay_on_upload() {
    let mut slow = WizardController::new(
        Arc::new(MockGateway::demo().with_delay(Duration::from_secs(10))),
        Duration::from_millis(20),
    );
    let err = slow.submit_receipt(&receipt()).await.unwrap_err();
    assert!(matches!(
        err,
        PatunganError::Extraction(ExtractionError::Timeout(_))
    ));
    assert_eq!(slow.step(), Step::Upload);

    let mut limited = wizard(MockGateway::failing(ExtractionError::Http {
        status: 429,
        body: "rate limited".into(),
    }));
    let err = limited.submit_receipt(&receipt()).await.unwrap_err();
    assert_eq!(err.to_string(), "API Error: 429 - rate limited");
    assert!(limited.state().bill().is_none());
}

#[tokio::test]
async fn reset_from_result_starts_a_new_session() {
    let mut wizard = wizard(MockGateway::demo());
    wizard.submit_receipt(&receipt()).await.unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard.choose_split_method(SplitMethod::Even).unwrap();
    wizard.next().unwrap();
    assert_eq!(
        wizard.state().outcome().results.get("Me"),
        Some(Money::new(15000.0))
    );

    wizard.reset();
    assert_eq!(wizard.step(), Step::Upload);
    assert!(wizard.state().outcome().results.is_empty());
    assert_eq!(wizard.state().split_method(), None);

    wizard.submit_receipt(&receipt()).await.unwrap();
    assert_eq!(wizard.step(), Step::Edit);
}
