//! Extraction prompt and parsing of the model's answer
//!
//! The model is asked for a fixed JSON shape. Answers are often wrapped in prose
//! or code fences, so the text between the first `{` and the last `}` is taken
//! as the JSON document. Numbers are accepted either as JSON numbers or as
//! numeric strings like `"15,000"`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::ExtractionError;
use crate::models::{BillRecord, LineItem, Money};

/// Instruction sent alongside the receipt image
pub const EXTRACTION_PROMPT: &str = r#"Please analyze this receipt/bill image and extract the following information in JSON format:
{
    "merchant_name": "Name of the store/restaurant",
    "total_amount": 0,
    "tax_amount": 0,
    "service_charge": 0,
    "items": [
        {
            "name": "Item name",
            "quantity": 1,
            "unit_price": 0,
            "total_price": 0
        }
    ],
    "date": "YYYY-MM-DD",
    "time": "HH:MM"
}

Important:
- Use Indonesian language for item names if they appear in Indonesian
- If tax or service charge is not visible, set to 0
- Ensure all prices are numbers (not strings)
- Return only valid JSON, no additional text"#;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Bill as the model returns it, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedBill {
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub tax_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub service_charge: Option<f64>,
    #[serde(default)]
    pub items: Vec<ExtractedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// One line of an [`ExtractedBill`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_price: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => Money::parse(&text)
            .map(|m| Some(m.value()))
            .map_err(serde::de::Error::custom),
    }
}

impl ExtractedBill {
    /// Parse a JSON document holding one bill
    pub fn from_json(json: &str) -> Result<Self, ExtractionError> {
        serde_json::from_str(json).map_err(|e| ExtractionError::Unparseable(e.to_string()))
    }

    /// Parse the model's free-form answer
    pub fn from_model_output(content: &str) -> Result<Self, ExtractionError> {
        let json = find_json_object(content).ok_or_else(|| {
            ExtractionError::Unparseable("the answer contains no JSON object".into())
        })?;
        Self::from_json(json)
    }

    /// Validate and convert into a [`BillRecord`]
    ///
    /// Missing tax and service charge count as zero. A missing item quantity
    /// counts as one, and a missing line total is computed from the unit price.
    /// Dates and times that do not parse are dropped.
    pub fn into_bill(self) -> Result<BillRecord, ExtractionError> {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.into_line_item(index))
            .collect::<Result<Vec<_>, _>>()?;

        let tax = Money::new(self.tax_amount.unwrap_or(0.0));
        let service = Money::new(self.service_charge.unwrap_or(0.0));
        let mut bill = BillRecord::new(
            self.merchant_name.unwrap_or_default(),
            items,
            tax,
            service,
        )
        .map_err(|e| ExtractionError::Unparseable(e.to_string()))?;

        if let Some(total) = self.total_amount {
            bill = bill.with_reported_total(Money::new(total));
        }

        let date = self
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).ok());
        let time = self.time.as_deref().and_then(parse_time);
        Ok(bill.with_issued_at(date, time))
    }
}

impl ExtractedItem {
    fn into_line_item(self, index: usize) -> Result<LineItem, ExtractionError> {
        let name = self.name.unwrap_or_default();
        if name.trim().is_empty() {
            return Err(ExtractionError::Unparseable(format!(
                "item {} has no name",
                index + 1
            )));
        }

        let quantity = self.quantity.unwrap_or(1.0);
        let unit_price = match (self.unit_price, self.total_price) {
            (Some(unit), _) => unit,
            (None, Some(total)) if quantity > 0.0 => total / quantity,
            _ => 0.0,
        };
        let total_price = self.total_price.unwrap_or(unit_price * quantity);

        if total_price < 0.0 {
            return Err(ExtractionError::Unparseable(format!(
                "item '{}' has a negative total",
                name.trim()
            )));
        }

        LineItem::with_total(name, quantity, Money::new(unit_price), Money::new(total_price))
            .map_err(|e| ExtractionError::Unparseable(e.to_string()))
    }
}

impl From<&BillRecord> for ExtractedBill {
    fn from(bill: &BillRecord) -> Self {
        Self {
            merchant_name: Some(bill.merchant_name().to_string()),
            total_amount: Some(bill.total_amount().value()),
            tax_amount: Some(bill.tax_amount().value()),
            service_charge: Some(bill.service_charge().value()),
            items: bill
                .items()
                .iter()
                .map(|item| ExtractedItem {
                    name: Some(item.name().to_string()),
                    quantity: Some(item.quantity()),
                    unit_price: Some(item.unit_price().value()),
                    total_price: Some(item.total_price().value()),
                })
                .collect(),
            date: bill.date().map(|d| d.format(DATE_FORMAT).to_string()),
            time: bill.time().map(|t| t.format(TIME_FORMAT).to_string()),
        }
    }
}

/// Slice from the first `{` to the last `}`, inclusive
pub fn find_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .ok()
}
