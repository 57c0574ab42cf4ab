use crate::traits::AttributeExpander;
use std::collections::BTreeMap;

/// Expands `${name}` references against a unit's attributes.
///
/// Unknown attributes expand to the empty string. An unterminated `${` is
/// kept as literal text.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttributeExpression;

impl AttributeExpander for AttributeExpression {
    fn expand(&self, template: &str, attributes: &BTreeMap<String, String>) -> String {
        expand(template, attributes)
    }
}

pub fn expand(template: &str, attributes: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = after[..end].trim();
                if let Some(value) = attributes.get(name) {
                    out.push_str(value);
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out
}
