//! Separates the CNPJ (company tax id) from the supplier name.
//!
//! Supplier cells carry free text such as `12.345.678/0001-99 ACME LTDA`.
//! Only the first id-shaped substring is extracted; a second one stays in
//! the name.

use once_cell::sync::Lazy;
use regex::Regex;

static TAX_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}").expect("valid tax id pattern"));

/// Split supplier text into `(tax_id, name)`.
///
/// With an id present, the name is the text with that id removed and the
/// ends trimmed. Without one, the text is returned untouched.
pub fn split(text: &str) -> (Option<String>, String) {
    match TAX_ID.find(text) {
        Some(m) => {
            let tax_id = m.as_str();
            let name = text.replace(tax_id, "").trim().to_string();
            (Some(tax_id.to_string()), name)
        }
        None => (None, text.to_string()),
    }
}
