//! Attribute name mangling.
//!
//! A setter attribute `name` can land on four differently-named members of
//! a built instance. This module derives those names so the container can
//! walk them in a fixed order.

/// Snake-case setter name: `set_` followed by the lowercased attribute.
///
/// ```
/// use sijill_support::naming::snake_setter;
///
/// assert_eq!(snake_setter("Step"), "set_step");
/// assert_eq!(snake_setter("max_size"), "set_max_size");
/// ```
pub fn snake_setter(attribute: &str) -> String {
    format!("set_{}", attribute.to_lowercase())
}

/// Camel-case setter name: `set` followed by the attribute with its first
/// character uppercased. The rest is kept as is.
///
/// ```
/// use sijill_support::naming::camel_setter;
///
/// assert_eq!(camel_setter("step"), "setStep");
/// assert_eq!(camel_setter("maxSize"), "setMaxSize");
/// ```
pub fn camel_setter(attribute: &str) -> String {
    let mut chars = attribute.chars();
    match chars.next() {
        Some(first) => {
            let mut name = String::with_capacity(attribute.len() + 3);
            name.push_str("set");
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
            name
        }
        None => String::from("set"),
    }
}
