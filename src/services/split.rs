//! Split engine
//!
//! Pure computation of who owes what. Given the same bill, participants,
//! method and assignment it always returns the same outcome.

use tracing::{debug, warn};

use crate::models::{
    BillRecord, ItemAssignment, Money, Participant, ResultSet, SplitMethod, SplitOutcome,
    UnassignedItemWarning,
};

/// Computes per-participant shares of a bill
pub struct SplitEngine;

impl SplitEngine {
    /// Split `bill` between `participants`
    ///
    /// `assignment` is only consulted for [`SplitMethod::PerItem`]; a missing
    /// assignment means no item has a payer.
    pub fn compute(
        bill: &BillRecord,
        participants: &[Participant],
        method: SplitMethod,
        assignment: Option<&ItemAssignment>,
    ) -> SplitOutcome {
        let outcome = match method {
            SplitMethod::Even => Self::even(bill, participants),
            SplitMethod::PerItem => {
                let empty = ItemAssignment::new();
                Self::per_item(bill, participants, assignment.unwrap_or(&empty))
            }
        };

        debug!(
            method = %method,
            shares = outcome.results.len(),
            distributed = %outcome.total(),
            "split computed"
        );
        outcome
    }

    /// Everyone pays `total / participant count`
    ///
    /// Shares are not rounded or rebalanced. Zero participants or a zero total
    /// yield an empty result.
    fn even(bill: &BillRecord, participants: &[Participant]) -> SplitOutcome {
        let total = bill.total_amount();
        if !total.is_positive() {
            return SplitOutcome::default();
        }
        let Some(share) = total.share(participants.len()) else {
            return SplitOutcome::default();
        };

        let mut results = ResultSet::new();
        for participant in participants {
            results.set(participant.name(), share);
        }

        SplitOutcome {
            results,
            warnings: Vec::new(),
        }
    }

    /// Each item's total is shared by its payers
    ///
    /// Tax and service charge are not distributed. Items without a payer who is
    /// also a participant are skipped and reported as warnings.
    fn per_item(
        bill: &BillRecord,
        participants: &[Participant],
        assignment: &ItemAssignment,
    ) -> SplitOutcome {
        let mut results = ResultSet::new();
        for participant in participants {
            results.set(participant.name(), Money::zero());
        }

        let mut warnings = Vec::new();
        for item in bill.items() {
            let payers: Vec<&str> = assignment
                .payers(item.id())
                .filter(|name| results.get(name).is_some())
                .collect();

            let Some(share) = item.total_price().share(payers.len()) else {
                warn!(item = item.name(), "item has no payer, leaving it out of the split");
                warnings.push(UnassignedItemWarning {
                    item_id: item.id(),
                    item_name: item.name().to_string(),
                    amount: item.total_price(),
                });
                continue;
            };

            for payer in payers {
                results.add(payer, share);
            }
        }

        SplitOutcome { results, warnings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;

    fn people(names: &[&str]) -> Vec<Participant> {
        names.iter().map(|n| Participant::new(*n).unwrap()).collect()
    }

    fn item(name: &str, total: f64) -> LineItem {
        LineItem::new(name, 1.0, Money::new(total)).unwrap()
    }

    fn bill(items: Vec<LineItem>, tax: f64, service: f64) -> BillRecord {
        BillRecord::new("Warung", items, Money::new(tax), Money::new(service)).unwrap()
    }

    #[test]
    fn test_even_split_two_people() {
        let bill = bill(vec![item("Teh", 15000.0)], 0.0, 0.0);
        let outcome = SplitEngine::compute(&bill, &people(&["Me", "Budi"]), SplitMethod::Even, None);

        assert_eq!(outcome.results.get("Me"), Some(Money::new(7500.0)));
        assert_eq!(outcome.results.get("Budi"), Some(Money::new(7500.0)));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_even_split_includes_tax_and_service() {
        let bill = bill(vec![item("Nasi", 20000.0)], 2000.0, 1000.0);
        let outcome = SplitEngine::compute(&bill, &people(&["A", "B", "C"]), SplitMethod::Even, None);

        let share = outcome.results.get("A").unwrap();
        assert!(share.approx_eq(Money::new(23000.0 / 3.0)));
        assert_eq!(outcome.results.get("C"), Some(share));
        assert!(outcome.total().approx_eq(Money::new(23000.0)));
    }

    #[test]
    fn test_even_split_sums_to_total_for_many_group_sizes() {
        let bill = bill(vec![item("Pizza", 100000.0), item("Cola", 333.33)], 11.0, 7.7);
        for count in 1..=13 {
            let names: Vec<String> = (0..count).map(|i| format!("P{}", i)).collect();
            let participants: Vec<Participant> =
                names.iter().map(|n| Participant::new(n.as_str()).unwrap()).collect();
            let outcome = SplitEngine::compute(&bill, &participants, SplitMethod::Even, None);
            assert!(
                outcome.total().approx_eq(bill.total_amount()),
                "{} people: {} vs {}",
                count,
                outcome.total(),
                bill.total_amount()
            );
        }
    }

    #[test]
    fn test_even_split_degenerate_inputs_are_empty() {
        let zero_bill = bill(vec![], 0.0, 0.0);
        let outcome = SplitEngine::compute(&zero_bill, &people(&["Me"]), SplitMethod::Even, None);
        assert!(outcome.results.is_empty());

        let bill = bill(vec![item("Teh", 15000.0)], 0.0, 0.0);
        let outcome = SplitEngine::compute(&bill, &[], SplitMethod::Even, None);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_per_item_excludes_unassigned_item() {
        let teh = item("Teh", 15000.0);
        let snack = item("Snack", 5000.0);
        let (teh_id, snack_id) = (teh.id(), snack.id());
        let bill = bill(vec![teh, snack], 0.0, 0.0);

        let mut assignment = ItemAssignment::new();
        assignment.set_payers(teh_id, ["Me", "Budi"]);

        let outcome = SplitEngine::compute(
            &bill,
            &people(&["Me", "Budi"]),
            SplitMethod::PerItem,
            Some(&assignment),
        );

        assert_eq!(outcome.results.get("Me"), Some(Money::new(7500.0)));
        assert_eq!(outcome.results.get("Budi"), Some(Money::new(7500.0)));
        assert_eq!(outcome.total(), Money::new(15000.0));
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].item_id, snack_id);
        assert_eq!(outcome.warnings[0].item_name, "Snack");
        assert_eq!(outcome.unassigned_total(), Money::new(5000.0));
    }

    #[test]
    fn test_per_item_leaves_out_tax_and_service() {
        let nasi = item("Nasi", 20000.0);
        let es = item("Es", 6000.0);
        let mut assignment = ItemAssignment::new();
        assignment.set_payers(nasi.id(), ["Me"]);
        assignment.set_payers(es.id(), ["Me", "Budi", "Sari"]);
        let bill = bill(vec![nasi, es], 2600.0, 1300.0);

        let outcome = SplitEngine::compute(
            &bill,
            &people(&["Me", "Budi", "Sari"]),
            SplitMethod::PerItem,
            Some(&assignment),
        );

        assert_eq!(outcome.results.get("Me"), Some(Money::new(22000.0)));
        assert_eq!(outcome.results.get("Budi"), Some(Money::new(2000.0)));
        assert_eq!(outcome.total(), bill.items_total());
        assert!(!outcome.has_warnings());
    }

    #[test]
    fn test_per_item_participant_without_items_owes_zero() {
        let teh = item("Teh", 15000.0);
        let mut assignment = ItemAssignment::new();
        assignment.set_payers(teh.id(), ["Budi"]);
        let bill = bill(vec![teh], 0.0, 0.0);

        let outcome = SplitEngine::compute(
            &bill,
            &people(&["Me", "Budi"]),
            SplitMethod::PerItem,
            Some(&assignment),
        );

        let entries: Vec<_> = outcome.results.iter().collect();
        assert_eq!(
            entries,
            vec![("Me", Money::zero()), ("Budi", Money::new(15000.0))]
        );
    }

    #[test]
    fn test_per_item_ignores_payers_who_are_not_participants() {
        let teh = item("Teh", 15000.0);
        let snack = item("Snack", 5000.0);
        let mut assignment = ItemAssignment::new();
        assignment.set_payers(teh.id(), ["Me", "Ghost"]);
        assignment.set_payers(snack.id(), ["Ghost"]);
        let bill = bill(vec![teh, snack], 0.0, 0.0);

        let outcome = SplitEngine::compute(&bill, &people(&["Me"]), SplitMethod::PerItem, Some(&assignment));

        assert_eq!(outcome.results.get("Me"), Some(Money::new(15000.0)));
        assert_eq!(outcome.results.get("Ghost"), None);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].item_name, "Snack");
    }

    #[test]
    fn test_per_item_without_assignment_warns_for_every_item() {
        let bill = bill(vec![item("Teh", 15000.0), item("Snack", 5000.0)], 0.0, 0.0);
        let outcome = SplitEngine::compute(&bill, &people(&["Me"]), SplitMethod::PerItem, None);

        assert_eq!(outcome.results.get("Me"), Some(Money::zero()));
        assert_eq!(outcome.warnings.len(), 2);
    }

    #[test]
    fn test_duplicate_item_names_are_assigned_separately() {
        let first = item("Es Teh", 5000.0);
        let second = item("Es Teh", 5000.0);
        let mut assignment = ItemAssignment::new();
        assignment.set_payers(first.id(), ["Me"]);
        assignment.set_payers(second.id(), ["Budi"]);
        let bill = bill(vec![first, second], 0.0, 0.0);

        let outcome = SplitEngine::compute(
            &bill,
            &people(&["Me", "Budi"]),
            SplitMethod::PerItem,
            Some(&assignment),
        );

        assert_eq!(outcome.results.get("Me"), Some(Money::new(5000.0)));
        assert_eq!(outcome.results.get("Budi"), Some(Money::new(5000.0)));
    }

    #[test]
    fn test_duplicate_participant_names_collapse_into_one_entry() {
        let bill = bill(vec![item("Teh", 15000.0)], 0.0, 0.0);
        let outcome =
            SplitEngine::compute(&bill, &people(&["Budi", "Budi", "Me"]), SplitMethod::Even, None);

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results.get("Budi"), Some(Money::new(5000.0)));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let teh = item("Teh", 15000.0);
        let mut assignment = ItemAssignment::new();
        assignment.set_payers(teh.id(), ["Me", "Budi"]);
        let bill = bill(vec![teh, item("Snack", 5000.0)], 1000.0, 0.0);
        let participants = people(&["Me", "Budi"]);

        for method in SplitMethod::all() {
            let first = SplitEngine::compute(&bill, &participants, method, Some(&assignment));
            let second = SplitEngine::compute(&bill, &participants, method, Some(&assignment));
            assert_eq!(first, second);
        }
    }
}
