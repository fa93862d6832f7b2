use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::{br_date, today};
use super::{Material, Unit, new_id};
use crate::error::ValidationError;
use crate::format::parse_decimal;

/// A material copied into a quote. Later catalog edits do not reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineItem {
    pub id: String,
    #[serde(default)]
    pub material_id: String,
    pub name: String,
    #[serde(default)]
    pub unit: Unit,
    pub unit_price: f64,
    pub quantity: f64,
    pub total: f64,
}

/// Stored snapshot of a quote's money figures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Totals {
    /// Sum of the line totals.
    pub materials: f64,
    /// Materials inflated by the profit margin; the cash price.
    pub general_total: f64,
    /// General total inflated by the card surcharge, when enabled.
    pub installment_total: f64,
}

impl Totals {
    /// No rounding happens here; figures are rounded only when formatted.
    pub fn compute(
        line_items: &[QuoteLineItem],
        margin_percent: f64,
        surcharge_percent: f64,
        surcharge_enabled: bool,
    ) -> Self {
        let materials: f64 = line_items.iter().map(|item| item.total).sum();
        let general_total = materials * (1.0 + margin_percent / 100.0);
        let installment_total = if surcharge_enabled {
            general_total * (1.0 + surcharge_percent / 100.0)
        } else {
            general_total
        };

        Self {
            materials,
            general_total,
            installment_total,
        }
    }
}

/// Standard work the shop states it does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Painting,
    Electrical,
    Plumbing,
    Masonry,
    Waterproofing,
    Finishing,
}

impl Exclusion {
    pub const ALL: [Exclusion; 6] = [
        Exclusion::Painting,
        Exclusion::Electrical,
        Exclusion::Plumbing,
        Exclusion::Masonry,
        Exclusion::Waterproofing,
        Exclusion::Finishing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Exclusion::Painting => "Painting",
            Exclusion::Electrical => "Electrical installation",
            Exclusion::Plumbing => "Plumbing",
            Exclusion::Masonry => "Masonry",
            Exclusion::Waterproofing => "Waterproofing",
            Exclusion::Finishing => "Special finishes",
        }
    }

    /// Wording printed on the client's document.
    pub fn document_label(self) -> &'static str {
        match self {
            Exclusion::Painting => "Pintura",
            Exclusion::Electrical => "Instalação elétrica",
            Exclusion::Plumbing => "Encanamento",
            Exclusion::Masonry => "Alvenaria",
            Exclusion::Waterproofing => "Impermeabilização",
            Exclusion::Finishing => "Acabamentos especiais",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Exclusions {
    pub painting: bool,
    pub electrical: bool,
    pub plumbing: bool,
    pub masonry: bool,
    pub waterproofing: bool,
    pub finishing: bool,
}

impl Exclusions {
    pub fn get(&self, exclusion: Exclusion) -> bool {
        match exclusion {
            Exclusion::Painting => self.painting,
            Exclusion::Electrical => self.electrical,
            Exclusion::Plumbing => self.plumbing,
            Exclusion::Masonry => self.masonry,
            Exclusion::Waterproofing => self.waterproofing,
            Exclusion::Finishing => self.finishing,
        }
    }

    pub fn toggle(&mut self, exclusion: Exclusion) {
        let flag = match exclusion {
            Exclusion::Painting => &mut self.painting,
            Exclusion::Electrical => &mut self.electrical,
            Exclusion::Plumbing => &mut self.plumbing,
            Exclusion::Masonry => &mut self.masonry,
            Exclusion::Waterproofing => &mut self.waterproofing,
            Exclusion::Finishing => &mut self.finishing,
        };
        *flag = !*flag;
    }

    pub fn active(&self) -> impl Iterator<Item = Exclusion> + '_ {
        Exclusion::ALL.into_iter().filter(|e| self.get(*e))
    }

    pub fn any(&self) -> bool {
        self.active().next().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub title: String,
    #[serde(rename = "date", with = "br_date", default = "today")]
    pub created_on: NaiveDate,
    #[serde(default)]
    pub line_items: Vec<QuoteLineItem>,
    #[serde(default)]
    pub margin_percent: f64,
    #[serde(default)]
    pub surcharge_percent: f64,
    #[serde(default)]
    pub surcharge_enabled: bool,
    #[serde(default)]
    pub exclusions: Exclusions,
    #[serde(default)]
    pub custom_exclusions: Vec<String>,
    #[serde(default)]
    pub owner_email: String,
    #[serde(default)]
    pub totals: Totals,
}

impl Quote {
    pub fn compute_totals(&self) -> Totals {
        Totals::compute(
            &self.line_items,
            self.margin_percent,
            self.surcharge_percent,
            self.surcharge_enabled,
        )
    }

    pub fn recompute_totals(&mut self) {
        self.totals = self.compute_totals();
    }

    /// True when the printed document needs a "not included" section.
    pub fn has_exclusions(&self) -> bool {
        self.exclusions.any() || !self.custom_exclusions.is_empty()
    }
}

/// Percentage typed by the user. Blank or unparseable input counts as zero.
pub fn parse_percentage(raw: &str) -> f64 {
    parse_decimal(raw).unwrap_or(0.0)
}

/// A quote under construction, before or during editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteDraft {
    /// Set when editing a stored quote.
    pub id: Option<String>,
    pub title: String,
    pub line_items: Vec<QuoteLineItem>,
    pub margin_input: String,
    pub surcharge_input: String,
    pub surcharge_enabled: bool,
    pub exclusions: Exclusions,
    pub custom_exclusions: Vec<String>,
}

impl QuoteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            id: Some(quote.id.clone()),
            title: quote.title.clone(),
            line_items: quote.line_items.clone(),
            margin_input: quote.margin_percent.to_string(),
            surcharge_input: quote.surcharge_percent.to_string(),
            surcharge_enabled: quote.surcharge_enabled,
            exclusions: quote.exclusions,
            custom_exclusions: quote.custom_exclusions.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn margin_percent(&self) -> f64 {
        parse_percentage(&self.margin_input)
    }

    pub fn surcharge_percent(&self) -> f64 {
        parse_percentage(&self.surcharge_input)
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(
            &self.line_items,
            self.margin_percent(),
            self.surcharge_percent(),
            self.surcharge_enabled,
        )
    }

    /// Copy a catalog material into the quote. The draft is left untouched on error.
    pub fn add_line_item(
        &mut self,
        catalog: &[Material],
        material_id: Option<&str>,
        quantity: &str,
    ) -> Result<&QuoteLineItem, ValidationError> {
        let material_id = material_id
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::MissingSelection)?;
        if quantity.trim().is_empty() {
            return Err(ValidationError::MissingSelection);
        }

        let quantity = parse_decimal(quantity)
            .filter(|q| *q > 0.0)
            .ok_or(ValidationError::InvalidQuantity)?;

        let material = catalog
            .iter()
            .find(|m| m.id == material_id)
            .ok_or_else(|| ValidationError::UnknownMaterial(material_id.to_string()))?;

        self.line_items.push(QuoteLineItem {
            id: new_id(),
            material_id: material.id.clone(),
            name: material.name.clone(),
            unit: material.unit,
            unit_price: material.unit_price,
            quantity,
            total: material.unit_price * quantity,
        });

        Ok(&self.line_items[self.line_items.len() - 1])
    }

    pub fn remove_line_item(&mut self, line_item_id: &str) {
        self.line_items.retain(|item| item.id != line_item_id);
    }

    /// Returns whether the exclusion was added. Blank text and exact duplicates are ignored.
    pub fn add_custom_exclusion(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || self.custom_exclusions.iter().any(|e| e == text) {
            return false;
        }
        self.custom_exclusions.push(text.to_string());
        true
    }

    pub fn remove_custom_exclusion(&mut self, index: usize) {
        if index < self.custom_exclusions.len() {
            self.custom_exclusions.remove(index);
        }
    }

    pub fn toggle_exclusion(&mut self, exclusion: Exclusion) {
        self.exclusions.toggle(exclusion);
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() || self.line_items.is_empty() {
            return Err(ValidationError::IncompleteQuote);
        }
        Ok(())
    }

    /// Build the record this draft would be stored as, with freshly computed totals.
    pub fn to_quote(&self, id: String, created_on: NaiveDate, owner_email: &str) -> Quote {
        let mut quote = Quote {
            id,
            title: self.title.trim().to_string(),
            created_on,
            line_items: self.line_items.clone(),
            margin_percent: self.margin_percent(),
            surcharge_percent: self.surcharge_percent(),
            surcharge_enabled: self.surcharge_enabled,
            exclusions: self.exclusions,
            custom_exclusions: self.custom_exclusions.clone(),
            owner_email: owner_email.to_string(),
            totals: Totals::default(),
        };
        quote.recompute_totals();
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(id: &str, price: f64) -> Material {
        Material {
            id: id.to_string(),
            name: format!("Material {id}"),
            category: "Chapas".to_string(),
            unit: Unit::Piece,
            unit_price: price,
            owner_email: "joao@example.com".to_string(),
        }
    }

    fn item(unit_price: f64, quantity: f64) -> QuoteLineItem {
        QuoteLineItem {
            id: new_id(),
            material_id: "m".to_string(),
            name: "MDF".to_string(),
            unit: Unit::SquareMeter,
            unit_price,
            quantity,
            total: unit_price * quantity,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn margin_without_surcharge() {
        let totals = Totals::compute(&[item(10.0, 2.0)], 20.0, 5.0, false);
        assert!(close(totals.materials, 20.0));
        assert!(close(totals.general_total, 24.0));
        assert!(close(totals.installment_total, 24.0));
    }

    #[test]
    fn margin_with_surcharge() {
        let totals = Totals::compute(&[item(10.0, 2.0)], 20.0, 5.0, true);
        assert!(close(totals.general_total, 24.0));
        assert!(close(totals.installment_total, 25.2));
    }

    #[test]
    fn empty_quote_is_zero() {
        let totals = Totals::compute(&[], 35.0, 10.0, true);
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn general_total_matches_formula_for_many_inputs() {
        let items = vec![item(12.75, 3.0), item(0.99, 17.0), item(250.0, 0.5)];
        let sum: f64 = items.iter().map(|i| i.total).sum();
        for margin in [0.0, 7.5, 20.0, 100.0, 333.3] {
            for surcharge in [0.0, 3.99, 12.0] {
                for enabled in [false, true] {
                    let totals = Totals::compute(&items, margin, surcharge, enabled);
                    assert!(close(totals.general_total, sum * (1.0 + margin / 100.0)));
                    let expected = if enabled {
                        totals.general_total * (1.0 + surcharge / 100.0)
                    } else {
                        totals.general_total
                    };
                    assert!(close(totals.installment_total, expected));
                }
            }
        }
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let items = vec![item(0.1, 3.0), item(0.2, 7.0)];
        let first = Totals::compute(&items, 12.345, 4.99, true);
        let second = Totals::compute(&items, 12.345, 4.99, true);
        assert_eq!(first.materials.to_bits(), second.materials.to_bits());
        assert_eq!(first.general_total.to_bits(), second.general_total.to_bits());
        assert_eq!(first.installment_total.to_bits(), second.installment_total.to_bits());
    }

    #[test]
    fn negative_margin_is_accepted() {
        let totals = Totals::compute(&[item(100.0, 1.0)], -10.0, 0.0, false);
        assert!(close(totals.general_total, 90.0));
    }

    #[test]
    fn percentages_default_to_zero() {
        assert_eq!(parse_percentage(""), 0.0);
        assert_eq!(parse_percentage("abc"), 0.0);
        assert_eq!(parse_percentage("12,5"), 12.5);

        let mut draft = QuoteDraft::new();
        draft.line_items.push(item(10.0, 1.0));
        draft.margin_input = "lots".to_string();
        assert!(close(draft.totals().general_total, 10.0));
    }

    #[test]
    fn add_line_item_copies_material() {
        let catalog = vec![material("a", 10.0), material("b", 7.5)];
        let mut draft = QuoteDraft::new();

        let added = draft.add_line_item(&catalog, Some("b"), "4").unwrap().clone();
        assert_eq!(added.material_id, "b");
        assert_eq!(added.name, "Material b");
        assert_eq!(added.unit, Unit::Piece);
        assert!(close(added.total, 30.0));
        assert!(!added.id.is_empty());

        draft.add_line_item(&catalog, Some("a"), "1").unwrap();
        assert_eq!(draft.line_items.len(), 2);
        assert_ne!(draft.line_items[0].id, draft.line_items[1].id);
    }

    #[test]
    fn add_line_item_requires_selection_and_positive_quantity() {
        let catalog = vec![material("a", 10.0)];
        let mut draft = QuoteDraft::new();

        assert_eq!(draft.add_line_item(&catalog, None, "2"), Err(ValidationError::MissingSelection));
        assert_eq!(draft.add_line_item(&catalog, Some("a"), ""), Err(ValidationError::MissingSelection));
        assert_eq!(draft.add_line_item(&catalog, Some("a"), "0"), Err(ValidationError::InvalidQuantity));
        assert_eq!(draft.add_line_item(&catalog, Some("a"), "-1"), Err(ValidationError::InvalidQuantity));
        assert_eq!(
            draft.add_line_item(&catalog, Some("gone"), "1"),
            Err(ValidationError::UnknownMaterial("gone".to_string()))
        );
        assert!(draft.line_items.is_empty());
    }

    #[test]
    fn catalog_edits_do_not_reach_existing_items() {
        let mut catalog = vec![material("a", 10.0)];
        let mut draft = QuoteDraft::new();
        draft.add_line_item(&catalog, Some("a"), "2").unwrap();

        catalog[0].unit_price = 99.0;
        catalog[0].name = "Renamed".to_string();

        assert!(close(draft.line_items[0].unit_price, 10.0));
        assert_eq!(draft.line_items[0].name, "Material a");
    }

    #[test]
    fn remove_line_item_ignores_unknown_ids() {
        let catalog = vec![material("a", 10.0)];
        let mut draft = QuoteDraft::new();
        draft.add_line_item(&catalog, Some("a"), "2").unwrap();
        let id = draft.line_items[0].id.clone();

        draft.remove_line_item("missing");
        assert_eq!(draft.line_items.len(), 1);

        draft.remove_line_item(&id);
        assert!(draft.line_items.is_empty());
        draft.remove_line_item(&id);
        assert!(draft.line_items.is_empty());
    }

    #[test]
    fn custom_exclusions_are_trimmed_and_unique() {
        let mut draft = QuoteDraft::new();
        assert!(draft.add_custom_exclusion("  Vidros  "));
        assert!(!draft.add_custom_exclusion("Vidros"));
        assert!(!draft.add_custom_exclusion("   "));
        assert!(draft.add_custom_exclusion("vidros"));
        assert!(draft.add_custom_exclusion("Frete"));
        assert_eq!(draft.custom_exclusions, vec!["Vidros", "vidros", "Frete"]);

        draft.remove_custom_exclusion(1);
        assert_eq!(draft.custom_exclusions, vec!["Vidros", "Frete"]);
        draft.remove_custom_exclusion(10);
        assert_eq!(draft.custom_exclusions.len(), 2);
    }

    #[test]
    fn validate_requires_title_and_items() {
        let catalog = vec![material("a", 10.0)];
        let mut draft = QuoteDraft::new();
        assert_eq!(draft.validate(), Err(ValidationError::IncompleteQuote));

        draft.title = "Cozinha".to_string();
        assert_eq!(draft.validate(), Err(ValidationError::IncompleteQuote));

        draft.add_line_item(&catalog, Some("a"), "1").unwrap();
        assert_eq!(draft.validate(), Ok(()));

        draft.title = "   ".to_string();
        assert_eq!(draft.validate(), Err(ValidationError::IncompleteQuote));
    }

    #[test]
    fn draft_round_trips_through_quote() {
        let catalog = vec![material("a", 10.0)];
        let mut draft = QuoteDraft::new();
        draft.title = "Armário".to_string();
        draft.add_line_item(&catalog, Some("a"), "2").unwrap();
        draft.margin_input = "20".to_string();
        draft.surcharge_input = "5".to_string();
        draft.surcharge_enabled = true;
        draft.toggle_exclusion(Exclusion::Plumbing);
        draft.add_custom_exclusion("Frete");

        let quote = draft.to_quote("q1".to_string(), today(), "joao@example.com");
        assert!(close(quote.totals.installment_total, 25.2));
        assert!(quote.has_exclusions());

        let mut reloaded = QuoteDraft::from_quote(&quote);
        assert!(reloaded.is_editing());
        assert_eq!(reloaded.margin_percent(), 20.0);
        assert_eq!(reloaded.totals(), quote.totals);

        reloaded.id = None;
        assert_eq!(reloaded, draft);
    }

    #[test]
    fn missing_optional_fields_load_with_defaults() {
        let json = r#"{
            "id": "1",
            "title": "Estante",
            "date": "02/01/2024",
            "lineItems": [],
            "marginPercent": 10,
            "surchargePercent": 0,
            "surchargeEnabled": false,
            "ownerEmail": "joao@example.com"
        }"#;
        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.exclusions, Exclusions::default());
        assert!(quote.custom_exclusions.is_empty());
        assert_eq!(quote.created_on, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(!quote.has_exclusions());
    }
}
