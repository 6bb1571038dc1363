//! Inventory record domain model.
//!
//! # Responsibility
//! - Define the keyed record held by the repository.
//! - Normalize identifiers and validate every mutable attribute.
//!
//! # Invariants
//! - `RecordId` is trimmed and upper-cased and never empty.
//! - `quantity` is non-negative by construction.
//! - `price` is finite and `>= 0`.
//! - `Record::apply` validates the whole patch before producing a new value;
//!   the receiver is never partially mutated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Validation failure for record identifiers and attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Identifier is empty after trimming.
    EmptyId,
    /// Identifier contains control characters.
    InvalidId(String),
    /// Display name is empty after trimming.
    EmptyName,
    NegativeQuantity(i64),
    NegativePrice(f64),
    /// Price is NaN or infinite.
    NonFinitePrice(f64),
    /// Quantity arithmetic left the representable range.
    QuantityOverflow,
    /// Update request carries no field at all.
    EmptyPatch,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "identifier cannot be empty"),
            Self::InvalidId(raw) => {
                write!(f, "identifier `{raw}` must not contain control characters")
            }
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::NegativeQuantity(value) => {
                write!(f, "quantity ({value}) must be >= 0")
            }
            Self::NegativePrice(value) => write!(f, "price ({value}) must be >= 0"),
            Self::NonFinitePrice(value) => write!(f, "price ({value}) must be a finite number"),
            Self::QuantityOverflow => write!(f, "quantity is out of range"),
            Self::EmptyPatch => write!(f, "update must change at least one field"),
        }
    }
}

impl Error for ValidationError {}

/// Normalized record identifier.
///
/// Parsing trims surrounding whitespace, collapses inner runs of whitespace
/// to one space and upper-cases the text, so `" prod  1"` and `"PROD 1"`
/// name the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Parses and normalizes raw identifier input.
    ///
    /// # Errors
    /// - `EmptyId` for blank input.
    /// - `InvalidId` when control characters (tab, newline, ...) are present.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ValidationError::InvalidId(trimmed.to_string()));
        }
        let collapsed = WHITESPACE_RE.replace_all(trimmed, " ");
        Ok(Self(collapsed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for RecordId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

/// Attributes supplied when a record is first added.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub name: String,
    /// Signed so that negative input reaches validation instead of wrapping.
    pub quantity: i64,
    pub price: f64,
}

impl NewRecord {
    pub fn new(name: impl Into<String>, quantity: i64, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }
}

/// Partial update request; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

impl RecordPatch {
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn price(price: f64) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.price.is_none()
    }
}

/// Canonical inventory record.
///
/// Fields are private; the only ways to obtain a `Record` are validated
/// constructors, `apply`, and deserialization (which validates too).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct Record {
    id: RecordId,
    name: String,
    quantity: u64,
    price: f64,
}

/// Unvalidated wire shape accepted on load.
///
/// Aliases accept the field names written by the earlier inventory tools.
#[derive(Deserialize)]
struct RecordFields {
    #[serde(alias = "id_producto")]
    id: String,
    #[serde(alias = "nombre")]
    name: String,
    #[serde(alias = "cantidad")]
    quantity: i64,
    #[serde(alias = "precio")]
    price: f64,
}

impl TryFrom<RecordFields> for Record {
    type Error = ValidationError;

    fn try_from(value: RecordFields) -> Result<Self, Self::Error> {
        Record::new(
            RecordId::parse(&value.id)?,
            NewRecord::new(value.name, value.quantity, value.price),
        )
    }
}

impl Record {
    /// Builds a record from an identifier and add-time attributes.
    ///
    /// # Errors
    /// Returns the first failing attribute in `name`, `quantity`, `price` order.
    pub fn new(id: RecordId, fields: NewRecord) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: validate_name(&fields.name)?,
            quantity: validate_quantity(fields.quantity)?,
            price: validate_price(fields.price)?,
        })
    }

    /// Returns a copy of this record with `patch` applied.
    ///
    /// All proposed values are validated before the copy is built, so a
    /// failure leaves no trace on `self`.
    pub fn apply(&self, patch: &RecordPatch) -> Result<Self, ValidationError> {
        if patch.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }

        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let quantity = patch.quantity.map(validate_quantity).transpose()?;
        let price = patch.price.map(validate_price).transpose()?;

        Ok(Self {
            id: self.id.clone(),
            name: name.unwrap_or_else(|| self.name.clone()),
            quantity: quantity.unwrap_or(self.quantity),
            price: price.unwrap_or(self.price),
        })
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Stock value of this record (`quantity * price`).
    pub fn value(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {} | qty {} | ${:.2} | total ${:.2}",
            self.id,
            self.name,
            self.quantity,
            self.price,
            self.value()
        )
    }
}

/// Trims and collapses inner whitespace; rejects blank names.
pub(crate) fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(collapsed.into_owned())
}

fn validate_quantity(value: i64) -> Result<u64, ValidationError> {
    u64::try_from(value).map_err(|_| ValidationError::NegativeQuantity(value))
}

fn validate_price(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinitePrice(value));
    }
    if value < 0.0 {
        return Err(ValidationError::NegativePrice(value));
    }
    // Folds `-0.0` into `0.0` so it never reaches the persisted document.
    Ok(if value == 0.0 { 0.0 } else { value })
}
