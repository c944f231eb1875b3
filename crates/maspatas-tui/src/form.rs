//! Draft form fields and the text-editing rules shared by every form.
//!
//! Forms never keep their own copy of what was typed: a field reads its
//! value out of the dashboard's [`Drafts`] and a keystroke produces the
//! whole new value, which the app writes back through the dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use maspatas_core::{Drafts, EntityKind};

// ── Fields ───────────────────────────────────────────────────────────

/// One editable field of one of the three drafts. Sale line fields carry
/// the line position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    ProductId,
    ProductName,
    Sku,
    PriceAmount,
    Currency,
    InitialStock,
    ClientId,
    FullName,
    Email,
    SaleId,
    SaleClient,
    LineProduct(usize),
    LineQuantity(usize),
}

impl DraftField {
    const PRODUCT: [Self; 6] = [
        Self::ProductId,
        Self::ProductName,
        Self::Sku,
        Self::PriceAmount,
        Self::Currency,
        Self::InitialStock,
    ];
    const CLIENT: [Self; 3] = [Self::ClientId, Self::FullName, Self::Email];

    pub fn kind(self) -> EntityKind {
        match self {
            Self::ProductId
            | Self::ProductName
            | Self::Sku
            | Self::PriceAmount
            | Self::Currency
            | Self::InitialStock => EntityKind::Product,
            Self::ClientId | Self::FullName | Self::Email => EntityKind::Client,
            Self::SaleId | Self::SaleClient | Self::LineProduct(_) | Self::LineQuantity(_) => {
                EntityKind::Sale
            }
        }
    }

    /// Fields of the `kind` form in tab order. The sale form has two
    /// fields per line, so its length follows the draft.
    pub fn for_form(kind: EntityKind, drafts: &Drafts) -> Vec<Self> {
        match kind {
            EntityKind::Product => Self::PRODUCT.to_vec(),
            EntityKind::Client => Self::CLIENT.to_vec(),
            EntityKind::Sale => {
                let mut fields = vec![Self::SaleId, Self::SaleClient];
                for i in 0..drafts.sale.lines().len() {
                    fields.push(Self::LineProduct(i));
                    fields.push(Self::LineQuantity(i));
                }
                fields
            }
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::ProductId => "Product ID".into(),
            Self::ProductName => "Name".into(),
            Self::Sku => "SKU".into(),
            Self::PriceAmount => "Price".into(),
            Self::Currency => "Currency".into(),
            Self::InitialStock => "Initial stock".into(),
            Self::ClientId => "Client ID".into(),
            Self::FullName => "Full name".into(),
            Self::Email => "Email".into(),
            Self::SaleId => "Sale ID".into(),
            Self::SaleClient => "Client ID".into(),
            Self::LineProduct(i) => format!("#{} product", i + 1),
            Self::LineQuantity(i) => format!("#{} quantity", i + 1),
        }
    }

    /// Current text of this field. A line that does not exist reads empty.
    pub fn value(self, drafts: &Drafts) -> String {
        let line = |i: usize| drafts.sale.lines().get(i);
        match self {
            Self::ProductId => drafts.product.product_id.clone(),
            Self::ProductName => drafts.product.name.clone(),
            Self::Sku => drafts.product.sku.clone(),
            Self::PriceAmount => drafts.product.price_amount.clone(),
            Self::Currency => drafts.product.currency.clone(),
            Self::InitialStock => drafts.product.initial_stock.clone(),
            Self::ClientId => drafts.client.client_id.clone(),
            Self::FullName => drafts.client.full_name.clone(),
            Self::Email => drafts.client.email.clone(),
            Self::SaleId => drafts.sale.sale_id.clone(),
            Self::SaleClient => drafts.sale.client_id.clone(),
            Self::LineProduct(i) => line(i).map(|l| l.product_id.clone()).unwrap_or_default(),
            Self::LineQuantity(i) => line(i).map(|l| l.quantity.clone()).unwrap_or_default(),
        }
    }

    /// Write `value` into `drafts`. Returns `false` for a line that does
    /// not exist.
    pub fn write(self, drafts: &mut Drafts, value: String) -> bool {
        match self {
            Self::ProductId => drafts.product.product_id = value,
            Self::ProductName => drafts.product.name = value,
            Self::Sku => drafts.product.sku = value,
            Self::PriceAmount => drafts.product.price_amount = value,
            Self::Currency => drafts.product.currency = value,
            Self::InitialStock => drafts.product.initial_stock = value,
            Self::ClientId => drafts.client.client_id = value,
            Self::FullName => drafts.client.full_name = value,
            Self::Email => drafts.client.email = value,
            Self::SaleId => drafts.sale.sale_id = value,
            Self::SaleClient => drafts.sale.client_id = value,
            Self::LineProduct(i) => return drafts.sale.update_line(i, |l| l.product_id = value),
            Self::LineQuantity(i) => return drafts.sale.update_line(i, |l| l.quantity = value),
        }
        true
    }
}

/// Next (or previous) field in `fields`, wrapping. An unknown `current`
/// lands on the first field.
pub fn cycle(fields: &[DraftField], current: DraftField, forward: bool) -> DraftField {
    let Some(first) = fields.first().copied() else {
        return current;
    };
    let Some(pos) = fields.iter().position(|&f| f == current) else {
        return first;
    };
    let len = fields.len();
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    fields.get(next).copied().unwrap_or(first)
}

// ── Text editing ─────────────────────────────────────────────────────

/// A keystroke that changes the text of the focused field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Clear,
}

impl TextEdit {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(Self::Clear),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => Some(Self::Insert(c)),
            (_, KeyCode::Backspace) => Some(Self::Backspace),
            _ => None,
        }
    }

    pub fn apply(self, current: &str) -> String {
        match self {
            Self::Insert(c) => {
                let mut s = current.to_owned();
                s.push(c);
                s
            }
            Self::Backspace => {
                let mut s = current.to_owned();
                s.pop();
                s
            }
            Self::Clear => String::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn sale_form_grows_with_its_lines() {
        let mut drafts = Drafts::default();
        assert_eq!(
            DraftField::for_form(EntityKind::Sale, &drafts),
            vec![
                DraftField::SaleId,
                DraftField::SaleClient,
                DraftField::LineProduct(0),
                DraftField::LineQuantity(0),
            ]
        );

        drafts.sale.push_line();
        let fields = DraftField::for_form(EntityKind::Sale, &drafts);
        assert_eq!(fields.len(), 6);
        assert_eq!(fields.last().copied(), Some(DraftField::LineQuantity(1)));
    }

    #[test]
    fn every_form_field_belongs_to_its_form() {
        let drafts = Drafts::default();
        for kind in [EntityKind::Product, EntityKind::Client, EntityKind::Sale] {
            for field in DraftField::for_form(kind, &drafts) {
                assert_eq!(field.kind(), kind, "{field:?}");
            }
        }
    }

    #[test]
    fn write_then_read_line_fields_by_position() {
        let mut drafts = Drafts::default();
        drafts.sale.push_line();

        assert!(DraftField::LineProduct(1).write(&mut drafts, "P-002".into()));
        assert!(DraftField::LineQuantity(1).write(&mut drafts, "3".into()));

        assert_eq!(DraftField::LineProduct(1).value(&drafts), "P-002");
        assert_eq!(DraftField::LineQuantity(1).value(&drafts), "3");
        // line 0 untouched
        assert_eq!(DraftField::LineProduct(0).value(&drafts), "");
        assert_eq!(DraftField::LineQuantity(0).value(&drafts), "1");
    }

    #[test]
    fn writing_a_missing_line_is_refused() {
        let mut drafts = Drafts::default();
        assert!(!DraftField::LineQuantity(4).write(&mut drafts, "2".into()));
        assert_eq!(drafts.sale.lines().len(), 1);
        assert_eq!(DraftField::LineQuantity(4).value(&drafts), "");
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let fields = DraftField::CLIENT;
        assert_eq!(cycle(&fields, DraftField::Email, true), DraftField::ClientId);
        assert_eq!(cycle(&fields, DraftField::ClientId, false), DraftField::Email);
        assert_eq!(cycle(&fields, DraftField::ClientId, true), DraftField::FullName);
    }

    #[test]
    fn cycle_from_a_stale_field_restarts() {
        let fields = DraftField::CLIENT;
        assert_eq!(cycle(&fields, DraftField::Sku, true), DraftField::ClientId);
        assert_eq!(cycle(&[], DraftField::Sku, true), DraftField::Sku);
    }

    #[test]
    fn text_edits_from_keys() {
        let insert = TextEdit::from_key(&key(KeyCode::Char('A'), KeyModifiers::SHIFT)).unwrap();
        assert_eq!(insert.apply("P-00"), "P-00A");

        let back = TextEdit::from_key(&key(KeyCode::Backspace, KeyModifiers::NONE)).unwrap();
        assert_eq!(back.apply("12"), "1");
        assert_eq!(back.apply(""), "");

        let clear = TextEdit::from_key(&key(KeyCode::Char('u'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(clear.apply("anything"), "");

        assert_eq!(TextEdit::from_key(&key(KeyCode::Char('n'), KeyModifiers::CONTROL)), None);
        assert_eq!(TextEdit::from_key(&key(KeyCode::Enter, KeyModifiers::NONE)), None);
    }
}
