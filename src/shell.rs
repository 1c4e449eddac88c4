//! Line-oriented contract editing.
//!
//! Each input line is parsed into a [`Command`] and run against a
//! [`Session`], which owns the field store, the per-field view state and the
//! draft path. Failed commands leave the session unchanged and the caller is
//! free to keep going.
//!
//! ```
//! use datacontract::shell::{Outcome, Session};
//!
//! let mut session = Session::default();
//! session.execute_line("add")?;
//! session.execute_line("set 0 name id")?;
//! session.execute_line("set 0 type integer")?;
//!
//! let Outcome::Continue(text) = session.execute_line("generate")? else {
//!     unreachable!()
//! };
//! assert!(text.contains("  id:\n    type: integer"));
//! # Ok::<(), datacontract::error::ContractError>(())
//! ```

use crate::contract::{
    ConstraintValue, Field, FieldPatch, FieldStore, FieldType, save_draft,
};
use crate::error::{ContractError, Result};
use crate::view::FieldViewState;
use std::path::PathBuf;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  add                              append a new field
  remove <i>                       delete field <i>
  set <i> <attr> <value>           attr: name, title, description, type, required, pii, phi
  clear <i> <attr>                 attr: title, description, sensitive, enumeration, constraints
  enum <i> <a, b, ...>             set allowed values (blank clears)
  constraint <i> <key> <value>     add or replace a constraint
  meta <key> <value>               key: name, domain, subdomain, data_product_name
  toggle <i>                       expand or collapse field <i> in the listing
  list                             show the fields
  generate                         print the contract document
  save [path]                      write the draft
  help                             show this text
  quit                             leave the editor";

/// Field attribute addressed by `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAttr {
    Name,
    Title,
    Description,
    Type,
    Required,
    Pii,
    Phi,
}

impl FromStr for FieldAttr {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Self::Name),
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "type" => Ok(Self::Type),
            "required" => Ok(Self::Required),
            "pii" => Ok(Self::Pii),
            "phi" => Ok(Self::Phi),
            other => Err(ContractError::InvalidCommand(format!(
                "unknown field attribute `{other}`"
            ))),
        }
    }
}

/// Optional field attribute addressed by `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalAttr {
    Title,
    Description,
    Sensitive,
    Enumeration,
    Constraints,
}

impl FromStr for OptionalAttr {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "sensitive" => Ok(Self::Sensitive),
            "enumeration" | "enum" => Ok(Self::Enumeration),
            "constraints" => Ok(Self::Constraints),
            other => Err(ContractError::InvalidCommand(format!(
                "`{other}` cannot be cleared"
            ))),
        }
    }
}

/// Contract metadata entry addressed by `meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    ContractName,
    Domain,
    Subdomain,
    DataProductName,
}

impl FromStr for MetaKey {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" | "contract_name" => Ok(Self::ContractName),
            "domain" => Ok(Self::Domain),
            "subdomain" => Ok(Self::Subdomain),
            "data_product_name" | "data_product" => Ok(Self::DataProductName),
            other => Err(ContractError::InvalidCommand(format!(
                "unknown metadata key `{other}`"
            ))),
        }
    }
}

/// One editing command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add,
    Remove(usize),
    Set {
        index: usize,
        attr: FieldAttr,
        value: String,
    },
    Clear {
        index: usize,
        attr: OptionalAttr,
    },
    Enumeration {
        index: usize,
        values: String,
    },
    Constraint {
        index: usize,
        key: String,
        value: ConstraintValue,
    },
    Meta {
        key: MetaKey,
        value: String,
    },
    Toggle(usize),
    List,
    Generate,
    Save(Option<PathBuf>),
    Help,
    Quit,
}

impl Command {
    /// Parse a single input line.
    ///
    /// # Errors
    ///
    /// [`ContractError::InvalidCommand`] for unknown commands, missing
    /// arguments or malformed indexes.
    pub fn parse(line: &str) -> Result<Self> {
        let (word, rest) = split_word(line.trim());

        match word {
            "add" => Ok(Self::Add),
            "remove" | "rm" => Ok(Self::Remove(parse_index(rest)?)),
            "set" => {
                let (index, rest) = split_word(rest);
                let (attr, value) = split_word(rest);
                Ok(Self::Set {
                    index: parse_index(index)?,
                    attr: require(attr, "attribute")?.parse()?,
                    value: value.to_owned(),
                })
            }
            "clear" => {
                let (index, attr) = split_word(rest);
                Ok(Self::Clear {
                    index: parse_index(index)?,
                    attr: require(attr, "attribute")?.parse()?,
                })
            }
            "enum" | "enumeration" => {
                let (index, values) = split_word(rest);
                Ok(Self::Enumeration {
                    index: parse_index(index)?,
                    values: values.to_owned(),
                })
            }
            "constraint" => {
                let (index, rest) = split_word(rest);
                let (key, value) = split_word(rest);
                Ok(Self::Constraint {
                    index: parse_index(index)?,
                    key: require(key, "constraint key")?.to_owned(),
                    value: ConstraintValue::infer(require(value, "constraint value")?),
                })
            }
            "meta" => {
                let (key, value) = split_word(rest);
                Ok(Self::Meta {
                    key: require(key, "metadata key")?.parse()?,
                    value: value.to_owned(),
                })
            }
            "toggle" => Ok(Self::Toggle(parse_index(rest)?)),
            "list" | "ls" => Ok(Self::List),
            "generate" | "gen" => Ok(Self::Generate),
            "save" => Ok(Self::Save((!rest.is_empty()).then(|| PathBuf::from(rest)))),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "" => Err(ContractError::InvalidCommand("empty command".to_owned())),
            other => Err(ContractError::InvalidCommand(format!(
                "unknown command `{other}` (try `help`)"
            ))),
        }
    }
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

fn require<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.is_empty() {
        Err(ContractError::InvalidCommand(format!("missing {what}")))
    } else {
        Ok(value)
    }
}

fn parse_index(text: &str) -> Result<usize> {
    let text = require(text.trim(), "field index")?;
    text.parse()
        .map_err(|_err| ContractError::InvalidCommand(format!("`{text}` is not a field index")))
}

fn parse_flag(text: &str) -> Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(ContractError::InvalidCommand(format!(
            "`{other}` is not true or false"
        ))),
    }
}

/// Result of running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to show the author; the session stays open
    Continue(String),
    Quit,
}

/// An editing session over one contract.
#[derive(Debug, Default)]
pub struct Session {
    store: FieldStore,
    view: FieldViewState,
    draft_path: Option<PathBuf>,
}

impl Session {
    /// Start editing `store`. Existing fields start collapsed.
    pub fn new(store: FieldStore, draft_path: Option<PathBuf>) -> Self {
        Self {
            store,
            view: FieldViewState::new(),
            draft_path,
        }
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn view(&self) -> &FieldViewState {
        &self.view
    }

    pub fn draft_path(&self) -> Option<&PathBuf> {
        self.draft_path.as_ref()
    }

    /// Parse and run one input line.
    ///
    /// # Errors
    ///
    /// Any parse or command error; the session is left unchanged.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome> {
        let command = Command::parse(line)?;
        self.execute(command)
    }

    /// Run one command.
    ///
    /// # Errors
    ///
    /// [`ContractError::DuplicateName`] and [`ContractError::IndexOutOfRange`]
    /// from the store, [`ContractError::InvalidFieldType`] for unknown types,
    /// [`ContractError::InvalidCommand`] for bad values, and I/O errors from
    /// `save`.
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        let message = match command {
            Command::Add => {
                let index = self.store.add();
                if let Some(id) = self.store.id_of(index) {
                    self.view.on_added(id);
                }
                format!("Added field {index}")
            }
            Command::Remove(index) => {
                let (_, field) = self.store.remove(index)?;
                self.view.retain_known(self.store.ids());
                format!("Removed field {index} ({})", field.display_name())
            }
            Command::Set { index, attr, value } => {
                let patch = self.set_patch(index, attr, &value)?;
                self.store.update(index, patch)?;
                format!("Updated field {index}")
            }
            Command::Clear { index, attr } => {
                let patch = match attr {
                    OptionalAttr::Title => FieldPatch::new().clear_title(),
                    OptionalAttr::Description => FieldPatch::new().clear_description(),
                    OptionalAttr::Sensitive => FieldPatch::new().clear_sensitive(),
                    OptionalAttr::Enumeration => FieldPatch::new().clear_enumeration(),
                    OptionalAttr::Constraints => FieldPatch::new().clear_constraints(),
                };
                self.store.update(index, patch)?;
                format!("Updated field {index}")
            }
            Command::Enumeration { index, values } => {
                self.store.set_enumeration_csv(index, &values)?;
                format!("Updated field {index}")
            }
            Command::Constraint { index, key, value } => {
                let mut constraints = self.field(index)?.constraints.clone().unwrap_or_default();
                constraints.insert(key, value);
                self.store
                    .update(index, FieldPatch::new().constraints(constraints))?;
                format!("Updated field {index}")
            }
            Command::Meta { key, value } => {
                match key {
                    MetaKey::ContractName => self.store.set_contract_name(value),
                    MetaKey::Domain => self.store.set_domain(value),
                    MetaKey::Subdomain => self.store.set_subdomain(value),
                    MetaKey::DataProductName => self.store.set_data_product_name(value),
                }
                "Updated contract metadata".to_owned()
            }
            Command::Toggle(index) => {
                let id = self.store.id_of(index).ok_or(ContractError::IndexOutOfRange {
                    index,
                    len: self.store.len(),
                })?;
                if self.view.toggle(id) {
                    format!("Expanded field {index}")
                } else {
                    format!("Collapsed field {index}")
                }
            }
            Command::List => self.render_listing(),
            Command::Generate => self.store.generate(),
            Command::Save(path) => {
                let path = path.or_else(|| self.draft_path.clone()).ok_or_else(|| {
                    ContractError::InvalidCommand("no draft path, use `save <path>`".to_owned())
                })?;
                save_draft(&self.store, &path)?;
                let message = format!("Saved draft to {}", path.display());
                self.draft_path = Some(path);
                message
            }
            Command::Help => HELP.to_owned(),
            Command::Quit => return Ok(Outcome::Quit),
        };

        Ok(Outcome::Continue(message))
    }

    fn field(&self, index: usize) -> Result<&Field> {
        self.store.get(index).ok_or(ContractError::IndexOutOfRange {
            index,
            len: self.store.len(),
        })
    }

    fn set_patch(&self, index: usize, attr: FieldAttr, value: &str) -> Result<FieldPatch> {
        let patch = FieldPatch::new();
        let patch = match attr {
            FieldAttr::Name => patch.name(value),
            FieldAttr::Title if value.is_empty() => patch.clear_title(),
            FieldAttr::Title => patch.title(value),
            FieldAttr::Description if value.is_empty() => patch.clear_description(),
            FieldAttr::Description => patch.description(value),
            FieldAttr::Type => patch.field_type(value.parse::<FieldType>()?),
            FieldAttr::Required => patch.required(parse_flag(value)?),
            FieldAttr::Pii | FieldAttr::Phi => {
                let flag = parse_flag(value)?;
                let mut sensitive = self.field(index)?.sensitive.unwrap_or_default();
                if attr == FieldAttr::Pii {
                    sensitive.pii = Some(flag);
                } else {
                    sensitive.phi = Some(flag);
                }
                patch.sensitive(sensitive)
            }
        };
        Ok(patch)
    }

    fn render_listing(&self) -> String {
        let metadata = self.store.metadata();
        let mut out = format!("Contract: {}", metadata.effective_name());
        for (label, value) in [
            ("domain", &metadata.domain),
            ("subdomain", &metadata.subdomain),
            ("data product", &metadata.data_product_name),
        ] {
            if !value.is_empty() {
                out.push_str(&format!("\n  {label}: {value}"));
            }
        }

        if self.store.is_empty() {
            out.push_str("\nNo fields yet, use `add` to create one.");
            return out;
        }

        out.push_str(&format!(
            "\n{} field(s), {} expanded",
            self.store.len(),
            self.view.expanded_count()
        ));
        for (index, (field, id)) in self.store.fields().iter().zip(self.store.ids()).enumerate() {
            let expanded = self.view.is_expanded(*id);
            out.push_str(&format!(
                "\n[{index}] {} {}: {}, {}",
                if expanded { "v" } else { ">" },
                field.display_name(),
                field.field_type,
                if field.required { "required" } else { "optional" },
            ));
            if expanded {
                render_details(&mut out, field);
            }
        }
        out
    }
}

fn render_details(out: &mut String, field: &Field) {
    if let Some(title) = &field.title {
        out.push_str(&format!("\n      title: {title}"));
    }
    if let Some(description) = &field.description {
        out.push_str(&format!("\n      description: {description}"));
    }
    if let Some(sensitive) = &field.sensitive {
        let flags: Vec<&str> = [("pii", sensitive.is_pii()), ("phi", sensitive.is_phi())]
            .into_iter()
            .filter_map(|(name, on)| on.then_some(name))
            .collect();
        let flags = if flags.is_empty() {
            "none".to_owned()
        } else {
            flags.join(", ")
        };
        out.push_str(&format!("\n      sensitive: {flags}"));
    }
    if let Some(values) = &field.enumeration {
        out.push_str(&format!("\n      enumeration: {}", values.join(", ")));
    }
    if let Some(constraints) = &field.constraints {
        let pairs: Vec<String> = constraints
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        out.push_str(&format!("\n      constraints: {}", pairs.join(", ")));
    }
}
