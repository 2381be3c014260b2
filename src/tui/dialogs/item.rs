//! Line item dialog
//!
//! Adds an item to the bill or corrects an extracted one. Changing the
//! quantity or unit price recomputes the line total; typing a different
//! total keeps it as entered.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::bill::format_quantity;
use crate::models::{ItemEdit, ItemId, LineItem, Money};
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::{Notification, TextInput};

use super::{form_hints, render_text_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Quantity,
    UnitPrice,
    Total,
}

const ADD_FIELDS: &[ItemField] = &[ItemField::Name, ItemField::Quantity, ItemField::UnitPrice];
const EDIT_FIELDS: &[ItemField] = &[
    ItemField::Name,
    ItemField::Quantity,
    ItemField::UnitPrice,
    ItemField::Total,
];

/// State of the item form
#[derive(Debug, Clone)]
pub struct ItemFormState {
    pub focused: ItemField,
    pub name: TextInput,
    pub quantity: TextInput,
    pub unit_price: TextInput,
    pub total: TextInput,
    /// The item being edited; `None` when adding
    original: Option<LineItem>,
    pub error_message: Option<String>,
}

impl Default for ItemFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemFormState {
    /// Empty form for a new item
    pub fn new() -> Self {
        Self {
            focused: ItemField::Name,
            name: TextInput::new().label("Name").placeholder("e.g. Nasi goreng"),
            quantity: TextInput::new().label("Quantity").content("1"),
            unit_price: TextInput::new().label("Unit price").placeholder("e.g. 15000"),
            total: TextInput::new().label("Total"),
            original: None,
            error_message: None,
        }
    }

    /// Form pre-filled with an existing item
    pub fn for_item(item: &LineItem) -> Self {
        let mut form = Self::new();
        form.name.set_value(item.name());
        form.quantity.set_value(format_quantity(item.quantity()));
        form.unit_price.set_value(plain_amount(item.unit_price()));
        form.total.set_value(plain_amount(item.total_price()));
        form.original = Some(item.clone());
        form
    }

    pub fn editing(&self) -> Option<ItemId> {
        self.original.as_ref().map(LineItem::id)
    }

    pub fn fields(&self) -> &'static [ItemField] {
        if self.original.is_some() {
            EDIT_FIELDS
        } else {
            ADD_FIELDS
        }
    }

    pub fn input(&self, field: ItemField) -> &TextInput {
        match field {
            ItemField::Name => &self.name,
            ItemField::Quantity => &self.quantity,
            ItemField::UnitPrice => &self.unit_price,
            ItemField::Total => &self.total,
        }
    }

    pub fn focused_input_mut(&mut self) -> &mut TextInput {
        match self.focused {
            ItemField::Name => &mut self.name,
            ItemField::Quantity => &mut self.quantity,
            ItemField::UnitPrice => &mut self.unit_price,
            ItemField::Total => &mut self.total,
        }
    }

    pub fn next_field(&mut self) {
        self.cycle(1);
    }

    pub fn prev_field(&mut self) {
        self.cycle(-1);
    }

    fn cycle(&mut self, delta: isize) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        let next = (current as isize + delta).rem_euclid(fields.len() as isize) as usize;
        self.focused = fields[next];
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    fn parse_quantity(&self) -> Result<f64, String> {
        let text = self.quantity.value().trim().replace(',', ".");
        text.parse::<f64>()
            .ok()
            .filter(|q| q.is_finite())
            .ok_or_else(|| format!("'{}' is not a quantity", self.quantity.value().trim()))
    }

    fn parse_amount(input: &TextInput) -> Result<Money, String> {
        Money::parse(input.value())
            .map_err(|_| format!("{}: enter an amount like 15000 or 15,000.00", input.label))
    }

    /// Name, quantity and unit price of a new item
    pub fn new_item_values(&self) -> Result<(String, f64, Money), String> {
        let name = self.name.value().trim().to_string();
        if name.is_empty() {
            return Err("Item name is required".to_string());
        }
        Ok((
            name,
            self.parse_quantity()?,
            Self::parse_amount(&self.unit_price)?,
        ))
    }

    /// Only the fields that differ from the item being edited
    pub fn edit(&self) -> Result<ItemEdit, String> {
        let Some(original) = &self.original else {
            return Err("No item is being edited".to_string());
        };

        let mut edit = ItemEdit::new();
        let name = self.name.value().trim();
        if name != original.name() {
            edit = edit.name(name);
        }
        let quantity = self.parse_quantity()?;
        if quantity != original.quantity() {
            edit = edit.quantity(quantity);
        }
        let unit_price = Self::parse_amount(&self.unit_price)?;
        if !unit_price.approx_eq(original.unit_price()) {
            edit = edit.unit_price(unit_price);
        }
        let total = Self::parse_amount(&self.total)?;
        if !total.approx_eq(original.total_price()) {
            edit = edit.total_price(total);
        }
        Ok(edit)
    }
}

/// Amount without thousands separators, easier to edit
fn plain_amount(amount: Money) -> String {
    let value = amount.value();
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Render the item dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let form = &app.item_form;
    let height = form.fields().len() as u16 + 6;
    let area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, area);

    let title = if form.editing().is_some() {
        " Edit Item "
    } else {
        " Add Item "
    };
    let block = Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };

    let mut constraints: Vec<Constraint> =
        form.fields().iter().map(|_| Constraint::Length(1)).collect();
    constraints.extend([
        Constraint::Length(1), // Spacer
        Constraint::Length(1), // Error
        Constraint::Length(1), // Hints
        Constraint::Min(0),
    ]);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in form.fields().iter().enumerate() {
        render_text_field(frame, chunks[i], form.input(*field), *field == form.focused);
    }

    let rows = form.fields().len();
    if let Some(ref error) = form.error_message {
        let line = Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)));
        frame.render_widget(Paragraph::new(line), chunks[rows + 1]);
    }
    frame.render_widget(
        Paragraph::new(form_hints(&[("[Tab]", "Next field")])),
        chunks[rows + 2],
    );
}

/// Handle key input for the item dialog
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => {
            if let Err(e) = save_item(app) {
                app.item_form.set_error(e);
            }
        }
        KeyCode::Tab | KeyCode::Down => app.item_form.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.item_form.prev_field(),
        _ => {
            let form = &mut app.item_form;
            if !form.focused_input_mut().handle_key(key) {
                return false;
            }
            form.clear_error();
        }
    }
    true
}

fn save_item(app: &mut App) -> Result<(), String> {
    let message = match app.item_form.editing() {
        Some(id) => {
            let edit = app.item_form.edit()?;
            app.controller
                .update_item(id, &edit)
                .map_err(|e| e.to_string())?;
            "Item updated".to_string()
        }
        None => {
            let (name, quantity, unit_price) = app.item_form.new_item_values()?;
            app.controller
                .add_item(&name, quantity, unit_price)
                .map_err(|e| e.to_string())?;
            app.selected_item = app.items().len().saturating_sub(1);
            format!("Added {}", name)
        }
    };

    app.close_dialog();
    app.notify(Notification::success(message));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> LineItem {
        LineItem::new("Teh", 2.0, Money::new(3000.0)).unwrap()
    }

    #[test]
    fn test_add_form_fields() {
        let mut form = ItemFormState::new();
        assert_eq!(form.fields().len(), 3);
        form.prev_field();
        assert_eq!(form.focused, ItemField::UnitPrice);

        form.name.set_value("  Kopi ");
        form.quantity.set_value("1,5");
        form.unit_price.set_value("Rp 12,000");
        let (name, quantity, price) = form.new_item_values().unwrap();
        assert_eq!(name, "Kopi");
        assert_eq!(quantity, 1.5);
        assert!(price.approx_eq(Money::new(12000.0)));
    }

    #[test]
    fn test_add_form_rejects_bad_input() {
        let mut form = ItemFormState::new();
        form.unit_price.set_value("1000");
        assert_eq!(form.new_item_values().unwrap_err(), "Item name is required");

        form.name.set_value("Kopi");
        form.unit_price.set_value("lots");
        assert!(form.new_item_values().unwrap_err().starts_with("Unit price:"));
    }

    #[test]
    fn test_unchanged_edit_is_empty() {
        let form = ItemFormState::for_item(&item());
        assert_eq!(form.fields().len(), 4);
        assert_eq!(form.unit_price.value(), "3000");
        assert_eq!(form.total.value(), "6000");
        assert!(form.edit().unwrap().is_empty());
    }

    #[test]
    fn test_edit_only_carries_changes() {
        let mut form = ItemFormState::for_item(&item());
        form.quantity.set_value("3");

        let edit = form.edit().unwrap();
        assert_eq!(edit, ItemEdit::new().quantity(3.0));
    }
}
