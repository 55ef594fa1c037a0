/// Converts an editor-facing CamelCase tag into the runtime's snake_case form.
///
/// Every uppercase character except the very first one is prefixed with an
/// underscore, and the whole result is lowercased: `GreaterThanOrEqual`
/// becomes `greater_than_or_equal`, `equal` stays `equal`.
pub fn camel_to_snake(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for (i, c) in input.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Key for node types that carry no user-assigned name: `{type}_{raw_id}`.
pub fn synthesized_key(output_type: &str, raw_id: &str) -> String {
    format!("{}_{}", output_type.to_lowercase(), raw_id)
}
