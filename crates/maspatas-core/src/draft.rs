// ── Draft forms ──
//
// Drafts hold exactly what the operator typed. Nothing is parsed while
// editing; `coerce()` turns a draft into the typed wire request once, at
// submission time, and reports the first field that does not fit.

use std::str::FromStr;

use maspatas_api::{EntityKind, NewClient, NewEntity, NewProduct, NewSale, NewSaleLine};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const DEFAULT_CURRENCY: &str = "USD";

// ── Product ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub price_amount: String,
    pub currency: String,
    pub initial_stock: String,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            product_id: String::new(),
            name: String::new(),
            sku: String::new(),
            price_amount: String::new(),
            currency: DEFAULT_CURRENCY.into(),
            initial_stock: "0".into(),
        }
    }
}

impl ProductDraft {
    pub fn coerce(&self) -> Result<NewProduct, CoreError> {
        let product_id = required("product_id", &self.product_id)?;
        let name = required("name", &self.name)?;
        let sku = required("sku", &self.sku)?;
        let price_amount = required("price_amount", &self.price_amount)?;
        if parse_decimal(&price_amount).is_none() {
            return Err(CoreError::validation(
                "price_amount",
                "must be a decimal amount",
            ));
        }

        Ok(NewProduct {
            product_id,
            name,
            sku,
            price_amount,
            currency: currency(&self.currency)?,
            initial_stock: required("initial_stock", &self.initial_stock)?
                .parse()
                .map_err(|_| {
                    CoreError::validation("initial_stock", "must be a non-negative integer")
                })?,
        })
    }
}

// ── Client ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDraft {
    pub client_id: String,
    pub full_name: String,
    pub email: String,
}

impl ClientDraft {
    pub fn coerce(&self) -> Result<NewClient, CoreError> {
        let client_id = required("client_id", &self.client_id)?;
        let full_name = required("full_name", &self.full_name)?;
        let email = required("email", &self.email)?;
        if !email.contains('@') {
            return Err(CoreError::validation("email", "must be an email address"));
        }

        Ok(NewClient {
            client_id,
            full_name,
            email,
        })
    }
}

// ── Sale ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineDraft {
    pub product_id: String,
    pub quantity: String,
}

impl Default for SaleLineDraft {
    fn default() -> Self {
        Self {
            product_id: String::new(),
            quantity: "1".into(),
        }
    }
}

/// A sale being composed. Lines are only ever appended; each one can be
/// edited in place by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDraft {
    pub sale_id: String,
    pub client_id: String,
    lines: Vec<SaleLineDraft>,
}

impl Default for SaleDraft {
    fn default() -> Self {
        Self {
            sale_id: String::new(),
            client_id: String::new(),
            lines: vec![SaleLineDraft::default()],
        }
    }
}

impl SaleDraft {
    pub fn lines(&self) -> &[SaleLineDraft] {
        &self.lines
    }

    /// Append an empty line and return its position.
    pub fn push_line(&mut self) -> usize {
        self.lines.push(SaleLineDraft::default());
        self.lines.len() - 1
    }

    /// Edit the line at `index`. Returns `false` if there is no such line.
    pub fn update_line(&mut self, index: usize, edit: impl FnOnce(&mut SaleLineDraft)) -> bool {
        match self.lines.get_mut(index) {
            Some(line) => {
                edit(line);
                true
            }
            None => false,
        }
    }

    pub fn coerce(&self) -> Result<NewSale, CoreError> {
        let sale_id = required("sale_id", &self.sale_id)?;
        let client_id = required("client_id", &self.client_id)?;
        if self.lines.is_empty() {
            return Err(CoreError::validation("lines", "at least one line is required"));
        }

        let lines = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let product_id = required(&format!("lines[{i}].product_id"), &line.product_id)?;
                let field = format!("lines[{i}].quantity");
                let quantity = required(&field, &line.quantity)?
                    .parse::<u32>()
                    .ok()
                    .filter(|q| *q >= 1)
                    .ok_or_else(|| CoreError::validation(&field, "must be an integer of at least 1"))?;
                Ok(NewSaleLine {
                    product_id,
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(NewSale {
            sale_id,
            client_id,
            lines,
        })
    }
}

// ── Tagged draft ────────────────────────────────────────────────────

/// One draft, tagged by the entity it will create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Product(ProductDraft),
    Client(ClientDraft),
    Sale(SaleDraft),
}

impl Draft {
    /// Default (empty) draft for `kind`.
    pub fn default_for(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Product => Self::Product(ProductDraft::default()),
            EntityKind::Client => Self::Client(ClientDraft::default()),
            EntityKind::Sale => Self::Sale(SaleDraft::default()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Product(_) => EntityKind::Product,
            Self::Client(_) => EntityKind::Client,
            Self::Sale(_) => EntityKind::Sale,
        }
    }

    /// Coerce into the wire request for this entity.
    pub fn coerce(&self) -> Result<NewEntity, CoreError> {
        Ok(match self {
            Self::Product(d) => NewEntity::Product(d.coerce()?),
            Self::Client(d) => NewEntity::Client(d.coerce()?),
            Self::Sale(d) => NewEntity::Sale(d.coerce()?),
        })
    }
}

/// The three drafts a dashboard holds at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drafts {
    pub product: ProductDraft,
    pub client: ClientDraft,
    pub sale: SaleDraft,
}

impl Drafts {
    pub fn get(&self, kind: EntityKind) -> Draft {
        match kind {
            EntityKind::Product => Draft::Product(self.product.clone()),
            EntityKind::Client => Draft::Client(self.client.clone()),
            EntityKind::Sale => Draft::Sale(self.sale.clone()),
        }
    }

    pub fn reset(&mut self, kind: EntityKind) {
        match Draft::default_for(kind) {
            Draft::Product(d) => self.product = d,
            Draft::Client(d) => self.client = d,
            Draft::Sale(d) => self.sale = d,
        }
    }
}

// ── Coercion helpers ────────────────────────────────────────────────

fn required(field: &str, value: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CoreError::validation(field, "is required"))
    } else {
        Ok(value.to_owned())
    }
}

fn currency(value: &str) -> Result<String, CoreError> {
    let code = required("currency", value)?.to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(CoreError::validation("currency", "must be a 3-letter code"))
    }
}

/// Parse a backend-style decimal string (`"9.99"`, `"1E+1"`).
pub(crate) fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collar() -> ProductDraft {
        ProductDraft {
            product_id: "P1".into(),
            name: "Collar".into(),
            sku: "COL-1".into(),
            price_amount: "9.99".into(),
            currency: "usd".into(),
            initial_stock: "5".into(),
        }
    }

    #[test]
    fn defaults_match_the_empty_forms() {
        let product = ProductDraft::default();
        assert_eq!(product.currency, "USD");
        assert_eq!(product.initial_stock, "0");

        let sale = SaleDraft::default();
        assert_eq!(sale.lines(), &[SaleLineDraft::default()]);
        assert_eq!(sale.lines()[0].quantity, "1");

        assert_eq!(Draft::default_for(EntityKind::Client), Draft::Client(ClientDraft::default()));
    }

    #[test]
    fn product_coercion_parses_stock_and_normalizes_currency() {
        let request = collar().coerce().unwrap();
        assert_eq!(request.initial_stock, 5);
        assert_eq!(request.currency, "USD");
        assert_eq!(request.price_amount, "9.99");
    }

    #[test]
    fn product_coercion_rejects_bad_fields() {
        let mut draft = collar();
        draft.initial_stock = "-1".into();
        let err = draft.coerce().unwrap_err();
        assert_eq!(err.to_string(), "initial_stock: must be a non-negative integer");

        let mut draft = collar();
        draft.currency = "EURO".into();
        assert!(matches!(
            draft.coerce(),
            Err(CoreError::Validation { ref field, .. }) if field == "currency"
        ));

        let mut draft = collar();
        draft.price_amount = "nine".into();
        assert!(draft.coerce().is_err());

        let mut draft = collar();
        draft.name = "   ".into();
        assert_eq!(draft.coerce().unwrap_err().to_string(), "name: is required");
    }

    #[test]
    fn blank_forms_report_their_first_field() {
        let err = ProductDraft::default().coerce().unwrap_err();
        assert_eq!(err.to_string(), "product_id: is required");

        let err = ClientDraft::default().coerce().unwrap_err();
        assert_eq!(err.to_string(), "client_id: is required");
    }

    #[test]
    fn client_requires_an_email_address() {
        let draft = ClientDraft {
            client_id: "C1".into(),
            full_name: "Ana".into(),
            email: "ana.example.com".into(),
        };
        assert!(draft.coerce().is_err());
    }

    #[test]
    fn sale_lines_append_and_edit_by_position() {
        let mut draft = SaleDraft {
            sale_id: "S1".into(),
            client_id: "C1".into(),
            ..SaleDraft::default()
        };
        assert!(draft.update_line(0, |l| {
            l.product_id = "P1".into();
            l.quantity = "2".into();
        }));
        let second = draft.push_line();
        assert_eq!(second, 1);
        assert!(draft.update_line(second, |l| l.product_id = "P2".into()));
        assert!(!draft.update_line(7, |l| l.product_id = "P9".into()));

        let request = draft.coerce().unwrap();
        let quantities: Vec<u32> = request.lines.iter().map(|l| l.quantity).collect();
        assert_eq!(quantities, vec![2, 1]);
    }

    #[test]
    fn sale_quantity_must_be_positive() {
        let mut draft = SaleDraft {
            sale_id: "S1".into(),
            client_id: "C1".into(),
            ..SaleDraft::default()
        };
        draft.update_line(0, |l| {
            l.product_id = "P1".into();
            l.quantity = "0".into();
        });
        assert_eq!(
            draft.coerce().unwrap_err().to_string(),
            "lines[0].quantity: must be an integer of at least 1"
        );
    }

    #[test]
    fn reset_restores_only_the_given_kind() {
        let mut drafts = Drafts::default();
        drafts.product = collar();
        drafts.client.full_name = "Ana".into();

        drafts.reset(EntityKind::Product);
        assert_eq!(drafts.product, ProductDraft::default());
        assert_eq!(drafts.client.full_name, "Ana");
    }

    #[test]
    fn backend_decimal_strings_parse() {
        assert_eq!(parse_decimal("9.99"), Some(Decimal::new(999, 2)));
        assert_eq!(parse_decimal("1E+1"), Some(Decimal::from(10)));
        assert_eq!(parse_decimal("abc"), None);
    }
}
