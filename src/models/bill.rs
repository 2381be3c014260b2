//! Bill model: the receipt record being split
//!
//! A `BillRecord` owns an ordered list of `LineItem`s plus tax and service
//! charge. Its total is never set directly: it is recomputed from the items,
//! tax and service charge every time one of them changes.

use chrono::{NaiveDate, NaiveTime};
use std::fmt;

use super::ids::ItemId;
use super::money::Money;

/// A single line on the receipt
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    id: ItemId,
    name: String,
    quantity: f64,
    unit_price: Money,
    total_price: Money,
}

impl LineItem {
    /// Create a freshly entered item; the total is `quantity * unit_price`
    pub fn new(
        name: impl Into<String>,
        quantity: f64,
        unit_price: Money,
    ) -> Result<Self, BillValidationError> {
        let total_price = unit_price.times(quantity);
        Self::with_total(name, quantity, unit_price, total_price)
    }

    /// Create an item whose total was read from the receipt and may differ
    /// from `quantity * unit_price` (discounts, rounding on the receipt)
    pub fn with_total(
        name: impl Into<String>,
        quantity: f64,
        unit_price: Money,
        total_price: Money,
    ) -> Result<Self, BillValidationError> {
        let item = Self {
            id: ItemId::new(),
            name: name.into().trim().to_string(),
            quantity,
            unit_price,
            total_price,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Whether the stored total still equals `quantity * unit_price`
    pub fn total_matches_unit_price(&self) -> bool {
        self.unit_price.times(self.quantity).approx_eq(self.total_price)
    }

    /// Apply an edit atomically: nothing changes if the result is invalid
    pub fn apply(&mut self, edit: &ItemEdit) -> Result<(), BillValidationError> {
        let mut updated = self.clone();

        if let Some(name) = &edit.name {
            updated.name = name.trim().to_string();
        }
        if let Some(quantity) = edit.quantity {
            updated.quantity = quantity;
        }
        if let Some(unit_price) = edit.unit_price {
            updated.unit_price = unit_price;
        }
        if edit.quantity.is_some() || edit.unit_price.is_some() {
            updated.total_price = updated.unit_price.times(updated.quantity);
        }
        if let Some(total_price) = edit.total_price {
            updated.total_price = total_price;
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Validate the item
    pub fn validate(&self) -> Result<(), BillValidationError> {
        if self.name.is_empty() {
            return Err(BillValidationError::EmptyItemName);
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(BillValidationError::NegativeQuantity(self.name.clone()));
        }
        if !self.unit_price.is_finite() || self.unit_price.is_negative() {
            return Err(BillValidationError::NegativeAmount("unit price"));
        }
        if !self.total_price.is_finite() {
            return Err(BillValidationError::NotANumber("total price"));
        }
        Ok(())
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.name, format_quantity(self.quantity), self.total_price)
    }
}

/// Render a quantity without a trailing ".0" for whole numbers
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{:.0}", quantity)
    } else {
        format!("{}", quantity)
    }
}

/// A partial update to a line item
///
/// Changing the quantity or unit price recomputes the total; an explicit
/// `total_price` is applied last and overrides it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemEdit {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<Money>,
    pub total_price: Option<Money>,
}

impl ItemEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn unit_price(mut self, unit_price: Money) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn total_price(mut self, total_price: Money) -> Self {
        self.total_price = Some(total_price);
        self
    }

    /// Check whether the edit changes anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.unit_price.is_none()
            && self.total_price.is_none()
    }
}

/// The receipt being split
#[derive(Debug, Clone, PartialEq)]
pub struct BillRecord {
    merchant_name: String,
    items: Vec<LineItem>,
    tax_amount: Money,
    service_charge: Money,
    total_amount: Money,
    /// Total printed on the receipt, as extracted; informational only
    reported_total: Option<Money>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
}

impl BillRecord {
    /// Create a bill; the total is computed from the parts
    pub fn new(
        merchant_name: impl Into<String>,
        items: Vec<LineItem>,
        tax_amount: Money,
        service_charge: Money,
    ) -> Result<Self, BillValidationError> {
        validate_surcharge(tax_amount, "tax amount")?;
        validate_surcharge(service_charge, "service charge")?;
        for item in &items {
            item.validate()?;
        }

        let mut bill = Self {
            merchant_name: merchant_name.into().trim().to_string(),
            items,
            tax_amount,
            service_charge,
            total_amount: Money::zero(),
            reported_total: None,
            date: None,
            time: None,
        };
        bill.recompute_total();
        Ok(bill)
    }

    /// Record the total printed on the receipt
    pub fn with_reported_total(mut self, total: Money) -> Self {
        self.reported_total = Some(total);
        self
    }

    /// Record when the receipt was issued
    pub fn with_issued_at(mut self, date: Option<NaiveDate>, time: Option<NaiveTime>) -> Self {
        self.date = date;
        self.time = time;
        self
    }

    pub fn merchant_name(&self) -> &str {
        &self.merchant_name
    }

    pub fn set_merchant_name(&mut self, name: impl Into<String>) {
        self.merchant_name = name.into().trim().to_string();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Position of an item in receipt order
    pub fn item_index(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Append an item and return its ID
    pub fn add_item(&mut self, item: LineItem) -> ItemId {
        let id = item.id;
        self.items.push(item);
        self.recompute_total();
        id
    }

    /// Remove an item, returning it
    pub fn remove_item(&mut self, id: ItemId) -> Option<LineItem> {
        let index = self.item_index(id)?;
        let removed = self.items.remove(index);
        self.recompute_total();
        Some(removed)
    }

    /// Apply an edit to one item
    pub fn edit_item(&mut self, id: ItemId, edit: &ItemEdit) -> Result<(), BillValidationError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(BillValidationError::UnknownItem(id))?;
        item.apply(edit)?;
        self.recompute_total();
        Ok(())
    }

    pub fn tax_amount(&self) -> Money {
        self.tax_amount
    }

    pub fn set_tax_amount(&mut self, amount: Money) -> Result<(), BillValidationError> {
        validate_surcharge(amount, "tax amount")?;
        self.tax_amount = amount;
        self.recompute_total();
        Ok(())
    }

    pub fn service_charge(&self) -> Money {
        self.service_charge
    }

    pub fn set_service_charge(&mut self, amount: Money) -> Result<(), BillValidationError> {
        validate_surcharge(amount, "service charge")?;
        self.service_charge = amount;
        self.recompute_total();
        Ok(())
    }

    /// Sum of item totals + tax + service charge
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Sum of item totals only
    pub fn items_total(&self) -> Money {
        self.items.iter().map(|item| item.total_price).sum()
    }

    pub fn reported_total(&self) -> Option<Money> {
        self.reported_total
    }

    /// Difference between the computed and the printed total, if they disagree
    pub fn reported_total_mismatch(&self) -> Option<Money> {
        self.reported_total
            .filter(|reported| !reported.approx_eq(self.total_amount))
            .map(|reported| self.total_amount - reported)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    fn recompute_total(&mut self) {
        self.total_amount = self.items_total() + self.tax_amount + self.service_charge;
    }
}

fn validate_surcharge(amount: Money, field: &'static str) -> Result<(), BillValidationError> {
    if !amount.is_finite() {
        return Err(BillValidationError::NotANumber(field));
    }
    if amount.is_negative() {
        return Err(BillValidationError::NegativeAmount(field));
    }
    Ok(())
}

/// Validation errors for bills and line items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillValidationError {
    EmptyItemName,
    NegativeQuantity(String),
    NegativeAmount(&'static str),
    NotANumber(&'static str),
    UnknownItem(ItemId),
}

impl fmt::Display for BillValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyItemName => write!(f, "Item name cannot be empty"),
            Self::NegativeQuantity(name) => {
                write!(f, "Quantity of '{}' must be zero or more", name)
            }
            Self::NegativeAmount(field) => write!(f, "The {} cannot be negative", field),
            Self::NotANumber(field) => write!(f, "The {} must be a number", field),
            Self::UnknownItem(id) => write!(f, "No item with ID {}", id),
        }
    }
}

impl std::error::Error for BillValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn teh() -> LineItem {
        LineItem::new("JAVANA TEH MLATI 350", 5.0, Money::new(3000.0)).unwrap()
    }

    #[test]
    fn test_new_item_computes_total() {
        let item = teh();
        assert_eq!(item.total_price(), Money::new(15000.0));
        assert!(item.total_matches_unit_price());
        assert_eq!(item.to_string(), "JAVANA TEH MLATI 350 (5) 15,000.00");
    }

    #[test]
    fn test_item_rejects_invalid_values() {
        assert_eq!(
            LineItem::new("  ", 1.0, Money::new(1.0)),
            Err(BillValidationError::EmptyItemName)
        );
        assert!(LineItem::new("Teh", -1.0, Money::new(1.0)).is_err());
        assert!(LineItem::new("Teh", 1.0, Money::new(-1.0)).is_err());
        assert!(LineItem::new("Teh", f64::NAN, Money::new(1.0)).is_err());
    }

    #[test]
    fn test_item_edit_recomputes_then_overrides() {
        let mut item = teh();

        item.apply(&ItemEdit::new().quantity(2.0)).unwrap();
        assert_eq!(item.total_price(), Money::new(6000.0));

        item.apply(&ItemEdit::new().total_price(5500.0.into())).unwrap();
        assert_eq!(item.total_price(), Money::new(5500.0));
        assert!(!item.total_matches_unit_price());

        // Unit price change recomputes again, dropping the override
        item.apply(&ItemEdit::new().unit_price(Money::new(2500.0))).unwrap();
        assert_eq!(item.total_price(), Money::new(5000.0));
    }

    #[test]
    fn test_invalid_edit_leaves_item_untouched() {
        let mut item = teh();
        let before = item.clone();
        assert!(item.apply(&ItemEdit::new().name("Es").quantity(-3.0)).is_err());
        assert_eq!(item, before);
    }

    #[test]
    fn test_bill_total_is_recomputed() {
        let mut bill = BillRecord::new("Warung", vec![teh()], Money::zero(), Money::zero()).unwrap();
        assert_eq!(bill.total_amount(), Money::new(15000.0));

        bill.set_tax_amount(Money::new(1500.0)).unwrap();
        bill.set_service_charge(Money::new(500.0)).unwrap();
        assert_eq!(bill.total_amount(), Money::new(17000.0));

        let snack = LineItem::new("Snack", 1.0, Money::new(5000.0)).unwrap();
        let snack_id = bill.add_item(snack);
        assert_eq!(bill.total_amount(), Money::new(22000.0));

        bill.edit_item(snack_id, &ItemEdit::new().quantity(2.0)).unwrap();
        assert_eq!(bill.total_amount(), Money::new(27000.0));

        bill.remove_item(snack_id).unwrap();
        assert_eq!(bill.total_amount(), Money::new(17000.0));
        assert_eq!(bill.items_total(), Money::new(15000.0));
    }

    #[test]
    fn test_bill_rejects_negative_surcharges() {
        let mut bill = BillRecord::new("Warung", vec![], Money::zero(), Money::zero()).unwrap();
        assert!(bill.set_tax_amount(Money::new(-1.0)).is_err());
        assert!(bill.set_service_charge(Money::new(-1.0)).is_err());
        assert_eq!(bill.total_amount(), Money::zero());
    }

    #[test]
    fn test_duplicate_item_names_have_distinct_ids() {
        let a = LineItem::new("Es Teh", 1.0, Money::new(5000.0)).unwrap();
        let b = LineItem::new("Es Teh", 1.0, Money::new(5000.0)).unwrap();
        let bill = BillRecord::new("Warung", vec![a.clone(), b.clone()], Money::zero(), Money::zero())
            .unwrap();
        assert_eq!(bill.item_index(a.id()), Some(0));
        assert_eq!(bill.item_index(b.id()), Some(1));
    }

    #[test]
    fn test_reported_total_mismatch() {
        let bill = BillRecord::new("Warung", vec![teh()], Money::zero(), Money::zero())
            .unwrap()
            .with_reported_total(Money::new(16000.0));
        assert_eq!(bill.reported_total_mismatch(), Some(Money::new(-1000.0)));

        let matching = BillRecord::new("Warung", vec![teh()], Money::zero(), Money::zero())
            .unwrap()
            .with_reported_total(Money::new(15000.0));
        assert_eq!(matching.reported_total_mismatch(), None);
    }
}
