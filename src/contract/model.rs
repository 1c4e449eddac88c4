//! Core data structures for data contract definitions.

use crate::error::ContractError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Contract name emitted when the author has not chosen one.
pub const DEFAULT_CONTRACT_NAME: &str = "MyDataContract";

/// Named validation parameters attached to a field, kept in insertion order.
pub type Constraints = IndexMap<String, ConstraintValue>;

/// Contract-level metadata.
///
/// Every value may be empty. Empty tags are left out of the rendered
/// document; an empty contract name falls back to [`DEFAULT_CONTRACT_NAME`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractMetadata {
    pub contract_name: String,
    pub domain: String,
    pub subdomain: String,
    pub data_product_name: String,
}

impl ContractMetadata {
    /// Name written to the `name:` line.
    pub fn effective_name(&self) -> &str {
        if self.contract_name.is_empty() {
            DEFAULT_CONTRACT_NAME
        } else {
            &self.contract_name
        }
    }
}

/// Data type of a contract field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Date,
    Timestamp,
    Array,
    Object,
}

impl FieldType {
    /// Every supported type, in the order editors list them.
    pub const ALL: [Self; 8] = [
        Self::String,
        Self::Integer,
        Self::Number,
        Self::Boolean,
        Self::Date,
        Self::Timestamp,
        Self::Array,
        Self::Object,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ContractError::InvalidFieldType(wanted.to_owned()))
    }
}

/// Sensitivity flags for a field.
///
/// A flag that is `None` is treated the same as `Some(false)` when rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensitivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pii: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phi: Option<bool>,
}

impl Sensitivity {
    /// Both flags explicitly off. New fields start with this value.
    pub fn cleared() -> Self {
        Self {
            pii: Some(false),
            phi: Some(false),
        }
    }

    pub fn is_pii(&self) -> bool {
        self.pii.unwrap_or(false)
    }

    pub fn is_phi(&self) -> bool {
        self.phi.unwrap_or(false)
    }
}

/// Value of a single constraint.
///
/// Untagged so that drafts store constraints as plain JSON scalars. JSON has
/// no NaN or infinity, so those numbers are stored as their rendered text and
/// load back as [`ConstraintValue::Text`] with the same output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintValue {
    Bool(bool),
    Integer(i64),
    #[serde(serialize_with = "serialize_number")]
    Number(f64),
    Text(String),
}

fn serialize_number<S>(num: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if num.is_finite() {
        serializer.serialize_f64(*num)
    } else {
        serializer.serialize_str(&ConstraintValue::Number(*num).to_string())
    }
}

impl ConstraintValue {
    /// Infer a value from editor input: booleans, then integers, then
    /// numbers, otherwise the trimmed text itself.
    pub fn infer(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(flag) = raw.parse::<bool>() {
            Self::Bool(flag)
        } else if let Ok(int) = raw.parse::<i64>() {
            Self::Integer(int)
        } else if let Some(num) = raw.parse::<f64>().ok().filter(|n| n.is_finite()) {
            Self::Number(num)
        } else {
            Self::Text(raw.to_owned())
        }
    }
}

impl fmt::Display for ConstraintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Integer(int) => write!(f, "{int}"),
            Self::Number(num) => fmt_number(*num, f),
            Self::Text(text) => f.write_str(text),
        }
    }
}

// Integral floats print without a fractional part and negative zero prints as 0.
// Magnitudes from 1e21 up and below 1e-6 switch to exponent form (`1e+21`, `1e-7`).
fn fmt_number(num: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if num.is_nan() {
        f.write_str("NaN")
    } else if num.is_infinite() {
        f.write_str(if num > 0.0 { "Infinity" } else { "-Infinity" })
    } else if num == 0.0 {
        f.write_str("0")
    } else if num.abs() >= 1e21 || num.abs() < 1e-6 {
        let exponent_form = format!("{num:e}");
        match exponent_form.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                write!(f, "{mantissa}e+{power}")
            }
            _ => f.write_str(&exponent_form),
        }
    } else {
        write!(f, "{num}")
    }
}

impl From<bool> for ConstraintValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConstraintValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ConstraintValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ConstraintValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ConstraintValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A single field of a data contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitive: Option<Sensitivity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
}

impl Default for Field {
    /// The value a freshly added field starts with.
    fn default() -> Self {
        Self {
            name: String::new(),
            title: None,
            description: None,
            field_type: FieldType::String,
            required: false,
            sensitive: Some(Sensitivity::cleared()),
            enumeration: None,
            constraints: None,
        }
    }
}

impl Field {
    /// A bare field: no title, description, sensitivity, enumeration or
    /// constraints.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            sensitive: None,
            ..Default::default()
        }
    }

    /// Label shown for the field in editors; unnamed fields get a placeholder.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(new field)"
        } else {
            &self.name
        }
    }
}

/// Edit to an optional attribute.
///
/// `Keep` leaves the attribute alone, `Set` replaces it whole and `Clear`
/// removes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Change<T> {
    #[default]
    Keep,
    Set(T),
    Clear,
}

impl<T> Change<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    fn apply(self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *slot = Some(value),
            Self::Clear => *slot = None,
        }
    }
}

/// Partial update for a [`Field`].
///
/// Attributes left untouched keep their current value; attributes that are
/// given replace the current value entirely (supplying `sensitive` replaces
/// both flags, supplying `constraints` replaces the whole map).
///
/// ```
/// use datacontract::contract::{FieldPatch, FieldType};
///
/// let patch = FieldPatch::new()
///     .name("customer_id")
///     .field_type(FieldType::Integer)
///     .required(true);
/// assert!(!patch.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub title: Change<String>,
    pub description: Change<String>,
    pub field_type: Option<FieldType>,
    pub required: Option<bool>,
    pub sensitive: Change<Sensitivity>,
    pub enumeration: Change<Vec<String>>,
    pub constraints: Change<Constraints>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that overwrites every attribute of a field with `field`'s values.
    pub fn replace_with(field: Field) -> Self {
        Self {
            name: Some(field.name),
            title: field.title.map_or(Change::Clear, Change::Set),
            description: field.description.map_or(Change::Clear, Change::Set),
            field_type: Some(field.field_type),
            required: Some(field.required),
            sensitive: field.sensitive.map_or(Change::Clear, Change::Set),
            enumeration: field.enumeration.map_or(Change::Clear, Change::Set),
            constraints: field.constraints.map_or(Change::Clear, Change::Set),
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Change::Set(title.into());
        self
    }

    #[must_use]
    pub fn clear_title(mut self) -> Self {
        self.title = Change::Clear;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Change::Set(description.into());
        self
    }

    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Change::Clear;
        self
    }

    #[must_use]
    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub fn sensitive(mut self, sensitive: Sensitivity) -> Self {
        self.sensitive = Change::Set(sensitive);
        self
    }

    #[must_use]
    pub fn clear_sensitive(mut self) -> Self {
        self.sensitive = Change::Clear;
        self
    }

    #[must_use]
    pub fn enumeration<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enumeration = Change::Set(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn clear_enumeration(mut self) -> Self {
        self.enumeration = Change::Clear;
        self
    }

    #[must_use]
    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = Change::Set(constraints);
        self
    }

    #[must_use]
    pub fn clear_constraints(mut self) -> Self {
        self.constraints = Change::Clear;
        self
    }

    /// True when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.title.is_keep()
            && self.description.is_keep()
            && self.field_type.is_none()
            && self.required.is_none()
            && self.sensitive.is_keep()
            && self.enumeration.is_keep()
            && self.constraints.is_keep()
    }

    pub(crate) fn apply_to(self, field: &mut Field) {
        if let Some(name) = self.name {
            field.name = name;
        }
        self.title.apply(&mut field.title);
        self.description.apply(&mut field.description);
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        self.sensitive.apply(&mut field.sensitive);
        self.enumeration.apply(&mut field.enumeration);
        self.constraints.apply(&mut field.constraints);
    }
}

/// Split comma-separated enumeration input into its entries.
///
/// Entries are trimmed and empty entries dropped. Returns `None` when nothing
/// is left, which editors treat as "no enumeration".
pub fn parse_enumeration(text: &str) -> Option<Vec<String>> {
    let values: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect();

    if values.is_empty() { None } else { Some(values) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parsing() {
        assert_eq!("integer".parse::<FieldType>().ok(), Some(FieldType::Integer));
        assert_eq!(" Timestamp ".parse::<FieldType>().ok(), Some(FieldType::Timestamp));
        assert!(matches!(
            "uuid".parse::<FieldType>(),
            Err(ContractError::InvalidFieldType(value)) if value == "uuid"
        ));
    }

    #[test]
    fn test_field_type_names_round_trip() {
        for ty in FieldType::ALL {
            assert_eq!(ty.as_str().parse::<FieldType>().ok(), Some(ty));
        }
    }

    #[test]
    fn test_new_field_defaults() {
        let field = Field::default();
        assert_eq!(field.name, "");
        assert_eq!(field.field_type, FieldType::String);
        assert!(!field.required);
        assert_eq!(field.sensitive, Some(Sensitivity::cleared()));
        assert!(field.enumeration.is_none());
        assert!(field.constraints.is_none());
    }

    #[test]
    fn test_patch_is_shallow() {
        let mut field = Field::default();
        field.sensitive = Some(Sensitivity {
            pii: Some(true),
            phi: Some(true),
        });

        FieldPatch::new()
            .sensitive(Sensitivity {
                pii: Some(true),
                phi: None,
            })
            .apply_to(&mut field);

        assert_eq!(
            field.sensitive,
            Some(Sensitivity {
                pii: Some(true),
                phi: None,
            })
        );
    }

    #[test]
    fn test_patch_keeps_absent_attributes() {
        let mut field = Field::new("amount", FieldType::Number);
        field.title = Some("Amount".to_owned());

        FieldPatch::new().required(true).apply_to(&mut field);

        assert_eq!(field.name, "amount");
        assert_eq!(field.title.as_deref(), Some("Amount"));
        assert_eq!(field.field_type, FieldType::Number);
        assert!(field.required);
    }

    #[test]
    fn test_patch_clear_removes_attribute() {
        let mut field = Field::new("status", FieldType::String);
        field.enumeration = Some(vec!["open".to_owned()]);

        FieldPatch::new().clear_enumeration().apply_to(&mut field);

        assert!(field.enumeration.is_none());
    }

    #[test]
    fn test_parse_enumeration() {
        assert_eq!(
            parse_enumeration(" A, B ,,C "),
            Some(vec!["A".to_owned(), "B".to_owned(), "C".to_owned()])
        );
        assert_eq!(parse_enumeration(" , ,"), None);
        assert_eq!(parse_enumeration(""), None);
    }

    #[test]
    fn test_constraint_value_inference() {
        assert_eq!(ConstraintValue::infer("true"), ConstraintValue::Bool(true));
        assert_eq!(ConstraintValue::infer("42"), ConstraintValue::Integer(42));
        assert_eq!(ConstraintValue::infer("0.5"), ConstraintValue::Number(0.5));
        assert_eq!(
            ConstraintValue::infer("^[A-Z]+$"),
            ConstraintValue::Text("^[A-Z]+$".to_owned())
        );
    }

    #[test]
    fn test_constraint_number_display() {
        assert_eq!(ConstraintValue::Number(5.0).to_string(), "5");
        assert_eq!(ConstraintValue::Number(2.5).to_string(), "2.5");
        assert_eq!(ConstraintValue::Number(-0.0).to_string(), "0");
        assert_eq!(ConstraintValue::Number(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(ConstraintValue::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_constraint_number_exponent_display() {
        assert_eq!(ConstraintValue::Number(1e21).to_string(), "1e+21");
        assert_eq!(ConstraintValue::Number(1.5e21).to_string(), "1.5e+21");
        assert_eq!(ConstraintValue::Number(-2.5e300).to_string(), "-2.5e+300");
        assert_eq!(ConstraintValue::Number(1e-7).to_string(), "1e-7");
        assert_eq!(ConstraintValue::Number(0.000001).to_string(), "0.000001");
        assert_eq!(ConstraintValue::Number(123456.0).to_string(), "123456");
        assert_eq!(ConstraintValue::Number(1e20).to_string(), "100000000000000000000");
    }

    #[test]
    fn test_non_finite_numbers_serialize_as_text() {
        let constraints: Constraints = [
            ("max".to_owned(), ConstraintValue::Number(f64::INFINITY)),
            ("min".to_owned(), ConstraintValue::Number(f64::NEG_INFINITY)),
            ("scale".to_owned(), ConstraintValue::Number(f64::NAN)),
            ("step".to_owned(), ConstraintValue::Number(0.5)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&constraints).unwrap();
        assert_eq!(
            json,
            r#"{"max":"Infinity","min":"-Infinity","scale":"NaN","step":0.5}"#
        );

        let loaded: Constraints = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded["max"], ConstraintValue::Text("Infinity".to_owned()));
        assert_eq!(loaded["step"], ConstraintValue::Number(0.5));
    }

    #[test]
    fn test_effective_contract_name() {
        let mut metadata = ContractMetadata::default();
        assert_eq!(metadata.effective_name(), DEFAULT_CONTRACT_NAME);
        metadata.contract_name = "Orders".to_owned();
        assert_eq!(metadata.effective_name(), "Orders");
    }
}
