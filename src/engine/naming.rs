//! Name templates for copies
//!
//! A template carries a `{base_name}` and a `{n}` placeholder. Only the first
//! occurrence of each is substituted.

pub const BASE_NAME_PLACEHOLDER: &str = "{base_name}";
pub const NUMBER_PLACEHOLDER: &str = "{n}";

/// Render just the number part of a name
pub fn render_number(index: u64, zero_pad: bool, pad_width: usize) -> String {
    if zero_pad {
        format!("{:0width$}", index, width = pad_width)
    } else {
        index.to_string()
    }
}

pub fn render(template: &str, base_name: &str, index: u64, zero_pad: bool, pad_width: usize) -> String {
    template
        .replacen(BASE_NAME_PLACEHOLDER, base_name, 1)
        .replacen(NUMBER_PLACEHOLDER, &render_number(index, zero_pad, pad_width), 1)
}

/// Render `count` consecutive names starting at `starting_index`
pub fn render_many(
    template: &str,
    base_name: &str,
    count: usize,
    zero_pad: bool,
    pad_width: usize,
    starting_index: u64,
) -> Vec<String> {
    (0..count as u64)
        .map(|i| render(template, base_name, starting_index + i, zero_pad, pad_width))
        .collect()
}

/// Recover the numeric part of a rendered name
///
/// Returns `None` when the template has no `{n}`, when the literal text around
/// `{n}` does not match, or when what remains is not all digits.
pub fn extract_suffix(rendered: &str, template: &str, base_name: &str) -> Option<String> {
    let pattern = template.replacen(BASE_NAME_PLACEHOLDER, base_name, 1);
    let at = pattern.find(NUMBER_PLACEHOLDER)?;
    let before = &pattern[..at];
    let after = &pattern[at + NUMBER_PLACEHOLDER.len()..];

    let number = rendered.strip_prefix(before)?.strip_suffix(after)?;
    if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
        Some(number.to_string())
    } else {
        None
    }
}

/// Name for a descendant of a renamed copy: `original [prefix]suffix`
pub fn render_child_name(original: &str, parent_suffix: &str, prefix: &str, apply: bool) -> String {
    if !apply {
        return original.to_string();
    }
    if prefix.is_empty() {
        format!("{}{}", original, parent_suffix)
    } else {
        format!("{} {}{}", original, prefix, parent_suffix)
    }
}
