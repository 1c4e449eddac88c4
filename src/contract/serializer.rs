//! Rendering of contracts into the contract document format.
//!
//! The output is line oriented with two spaces of indentation per level:
//!
//! ```text
//! tags:
//!   domain: sales
//! name: MyDataContract
//! fields:
//!   id:
//!     type: integer
//!     required: true
//! ```
//!
//! Rendering is total and deterministic. Values are written verbatim: titles
//! and descriptions are wrapped in double quotes without escaping, while
//! enumeration entries and constraint values are never quoted.

use super::model::{ContractMetadata, Field};

const INDENT: &str = "  ";

/// Render `metadata` and `fields` as a contract document.
///
/// Lines are separated by `\n` with no trailing newline.
pub fn generate(metadata: &ContractMetadata, fields: &[Field]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("tags:".to_owned());
    push_non_empty(&mut lines, 1, "domain", &metadata.domain);
    push_non_empty(&mut lines, 1, "subdomain", &metadata.subdomain);
    push_non_empty(&mut lines, 1, "data_product_name", &metadata.data_product_name);

    lines.push(format!("name: {}", metadata.effective_name()));

    lines.push("fields:".to_owned());
    for field in fields {
        render_field(&mut lines, field);
    }

    tracing::debug!(
        fields = fields.len(),
        lines = lines.len(),
        "Generated contract document"
    );
    lines.join("\n")
}

/// Render one field entry with its body one level deeper.
fn render_field(lines: &mut Vec<String>, field: &Field) {
    push_line(lines, 1, &format!("{}:", field.name));

    if let Some(title) = field.title.as_deref().filter(|t| !t.is_empty()) {
        push_line(lines, 2, &format!("title: \"{title}\""));
    }
    if let Some(description) = field.description.as_deref().filter(|d| !d.is_empty()) {
        push_line(lines, 2, &format!("description: \"{description}\""));
    }

    push_line(lines, 2, &format!("type: {}", field.field_type));
    push_line(lines, 2, &format!("required: {}", field.required));

    if let Some(sensitive) = &field.sensitive {
        push_line(lines, 2, "sensitive:");
        if sensitive.is_pii() {
            push_line(lines, 3, "pii: true");
        }
        if sensitive.is_phi() {
            push_line(lines, 3, "phi: true");
        }
    }

    if let Some(values) = field.enumeration.as_ref().filter(|v| !v.is_empty()) {
        push_line(lines, 2, "enumeration:");
        for value in values {
            push_line(lines, 3, &format!("- {value}"));
        }
    }

    if let Some(constraints) = field.constraints.as_ref().filter(|c| !c.is_empty()) {
        push_line(lines, 2, "constraints:");
        for (key, value) in constraints {
            push_line(lines, 3, &format!("{key}: {value}"));
        }
    }
}

fn push_non_empty(lines: &mut Vec<String>, depth: usize, key: &str, value: &str) {
    if !value.is_empty() {
        push_line(lines, depth, &format!("{key}: {value}"));
    }
}

fn push_line(lines: &mut Vec<String>, depth: usize, text: &str) {
    lines.push(format!("{}{text}", INDENT.repeat(depth)));
}
