//! Split models: method, per-item payer assignment and computed results

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ItemId;
use super::money::Money;

/// How the bill is divided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMethod {
    /// Everyone pays the same share of the full total
    Even,
    /// Each item is shared by the people assigned to it
    PerItem,
}

impl SplitMethod {
    /// Parse a split method from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "even" | "equal" | "rata" => Some(Self::Even),
            "per-item" | "per_item" | "peritem" | "item" | "items" => Some(Self::PerItem),
            _ => None,
        }
    }

    /// Both methods in display order
    pub fn all() -> [Self; 2] {
        [Self::Even, Self::PerItem]
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Even => write!(f, "Even split"),
            Self::PerItem => write!(f, "Per item"),
        }
    }
}

/// Which participants pay for which item, keyed by item ID
///
/// Payers are kept in the order they were assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemAssignment {
    payers: IndexMap<ItemId, IndexSet<String>>,
}

impl ItemAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payers assigned to an item, in assignment order
    pub fn payers(&self, item: ItemId) -> impl Iterator<Item = &str> {
        self.payers
            .get(&item)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Check whether a participant pays for an item
    pub fn is_assigned(&self, item: ItemId, name: &str) -> bool {
        self.payers
            .get(&item)
            .is_some_and(|set| set.contains(name))
    }

    /// Add a payer to an item; returns false if already assigned
    pub fn assign(&mut self, item: ItemId, name: impl Into<String>) -> bool {
        self.payers.entry(item).or_default().insert(name.into())
    }

    /// Remove a payer from an item; returns false if not assigned
    pub fn unassign(&mut self, item: ItemId, name: &str) -> bool {
        let Some(set) = self.payers.get_mut(&item) else {
            return false;
        };
        let removed = set.shift_remove(name);
        if set.is_empty() {
            self.payers.shift_remove(&item);
        }
        removed
    }

    /// Flip a payer on or off; returns whether the payer is now assigned
    pub fn toggle(&mut self, item: ItemId, name: &str) -> bool {
        if self.unassign(item, name) {
            false
        } else {
            self.assign(item, name)
        }
    }

    /// Replace all payers of an item
    pub fn set_payers<I, S>(&mut self, item: ItemId, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: IndexSet<String> = names.into_iter().map(Into::into).collect();
        if set.is_empty() {
            self.payers.shift_remove(&item);
        } else {
            self.payers.insert(item, set);
        }
    }

    /// Drop everything assigned to an item
    pub fn remove_item(&mut self, item: ItemId) {
        self.payers.shift_remove(&item);
    }

    /// Drop a participant from every item
    pub fn remove_participant(&mut self, name: &str) {
        for set in self.payers.values_mut() {
            set.shift_remove(name);
        }
        self.payers.retain(|_, set| !set.is_empty());
    }

    /// Rename a participant on every item, keeping their position
    pub fn rename_participant(&mut self, old: &str, new: &str) {
        for set in self.payers.values_mut() {
            if let Some(index) = set.get_index_of(old) {
                if set.contains(new) {
                    set.shift_remove_index(index);
                } else {
                    let renamed: IndexSet<String> = set
                        .iter()
                        .map(|name| if name == old { new.to_string() } else { name.clone() })
                        .collect();
                    *set = renamed;
                }
            }
        }
    }

    /// Whether no item has any payer
    pub fn is_empty(&self) -> bool {
        self.payers.is_empty()
    }

    pub fn clear(&mut self) {
        self.payers.clear();
    }
}

/// Amount owed per participant name, in participant order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet(IndexMap<String, Money>);

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount owed by a participant
    pub fn get(&self, name: &str) -> Option<Money> {
        self.0.get(name).copied()
    }

    /// Entries in participant order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.0.iter().map(|(name, amount)| (name.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of every share
    pub fn total(&self) -> Money {
        self.0.values().sum()
    }

    /// Set a participant's amount, keeping their original position
    pub(crate) fn set(&mut self, name: &str, amount: Money) {
        self.0.insert(name.to_string(), amount);
    }

    /// Add to a participant's running amount
    pub(crate) fn add(&mut self, name: &str, amount: Money) {
        *self.0.entry(name.to_string()).or_insert(Money::zero()) += amount;
    }
}

/// An item nobody was assigned to pay for; its price is left out of the split
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnassignedItemWarning {
    pub item_id: ItemId,
    pub item_name: String,
    pub amount: Money,
}

impl fmt::Display for UnassignedItemWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item '{}' has not been assigned to anyone", self.item_name)
    }
}

/// Result of running a split: the shares plus any warnings raised
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SplitOutcome {
    pub results: ResultSet,
    pub warnings: Vec<UnassignedItemWarning>,
}

impl SplitOutcome {
    /// Sum of all shares
    pub fn total(&self) -> Money {
        self.results.total()
    }

    /// Sum of the item prices left out because nobody pays for them
    pub fn unassigned_total(&self) -> Money {
        self.warnings.iter().map(|w| w.amount).sum()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_method_parse() {
        assert_eq!(SplitMethod::parse("even"), Some(SplitMethod::Even));
        assert_eq!(SplitMethod::parse("Per-Item"), Some(SplitMethod::PerItem));
        assert_eq!(SplitMethod::parse("items"), Some(SplitMethod::PerItem));
        assert_eq!(SplitMethod::parse("random"), None);
    }

    #[test]
    fn test_assignment_keeps_order_and_uniqueness() {
        let item = ItemId::new();
        let mut assignment = ItemAssignment::new();

        assert!(assignment.assign(item, "Budi"));
        assert!(assignment.assign(item, "Me"));
        assert!(!assignment.assign(item, "Budi"));

        let payers: Vec<_> = assignment.payers(item).collect();
        assert_eq!(payers, vec!["Budi", "Me"]);
        assert_eq!(assignment.payers(item).count(), 2);
    }

    #[test]
    fn test_toggle_and_empty_cleanup() {
        let item = ItemId::new();
        let mut assignment = ItemAssignment::new();

        assert!(assignment.toggle(item, "Me"));
        assert!(assignment.is_assigned(item, "Me"));
        assert!(!assignment.toggle(item, "Me"));
        assert!(assignment.is_empty());
    }

    #[test]
    fn test_remove_and_rename_participant() {
        let teh = ItemId::new();
        let snack = ItemId::new();
        let mut assignment = ItemAssignment::new();
        assignment.set_payers(teh, ["Me", "Budi", "Sari"]);
        assignment.set_payers(snack, ["Budi"]);

        assignment.rename_participant("Budi", "Budi S");
        assert_eq!(
            assignment.payers(teh).collect::<Vec<_>>(),
            vec!["Me", "Budi S", "Sari"]
        );

        assignment.remove_participant("Budi S");
        assert_eq!(assignment.payers(teh).collect::<Vec<_>>(), vec!["Me", "Sari"]);
        assert_eq!(assignment.payers(snack).count(), 0);
    }

    #[test]
    fn test_rename_onto_existing_payer_merges() {
        let item = ItemId::new();
        let mut assignment = ItemAssignment::new();
        assignment.set_payers(item, ["Me", "Budi"]);

        assignment.rename_participant("Budi", "Me");
        assert_eq!(assignment.payers(item).collect::<Vec<_>>(), vec!["Me"]);
    }

    #[test]
    fn test_result_set_preserves_insertion_order() {
        let mut results = ResultSet::new();
        results.set("Me", Money::zero());
        results.set("Budi", Money::zero());
        results.add("Budi", Money::new(100.0));
        results.add("Me", Money::new(50.0));

        let names: Vec<_> = results.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Me", "Budi"]);
        assert_eq!(results.total(), Money::new(150.0));
    }
}
