//! Construction recipes.
//!
//! A [`RawRecipe`] is what the host configuration supplies: every field is
//! optional. The container normalizes it exactly once, at construction,
//! into a [`Recipe`] with all defaults applied.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scope::Scope;

/// A configuration entry as supplied by the host, before defaulting.
///
/// # Examples
/// ```
/// use sijill_container::recipe::RawRecipe;
///
/// let recipe = RawRecipe::new("Counter")
///     .arg(10)
///     .attr("step", 2)
///     .lazy(true)
///     .normalize();
///
/// assert!(recipe.use_singleton);
/// assert!(recipe.use_lazyload);
/// assert_eq!(recipe.constructor_attributes.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constructor_attributes: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter_attributes: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_singleton: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_lazyload: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_be_set: Option<bool>,
}

impl RawRecipe {
    /// Starts a recipe for `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    /// A class-less entry whose instance is always supplied through `set`.
    ///
    /// It is lazy, so the container does not try to build it at startup.
    pub fn placeholder() -> Self {
        Self {
            use_lazyload: Some(true),
            must_be_set: Some(true),
            ..Self::default()
        }
    }

    /// Appends a positional constructor argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.constructor_attributes
            .get_or_insert_with(Vec::new)
            .push(value.into());
        self
    }

    /// Adds (or replaces) a setter attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.setter_attributes
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn singleton(mut self, use_singleton: bool) -> Self {
        self.use_singleton = Some(use_singleton);
        self
    }

    pub fn lazy(mut self, use_lazyload: bool) -> Self {
        self.use_lazyload = Some(use_lazyload);
        self
    }

    pub fn must_be_set(mut self, must_be_set: bool) -> Self {
        self.must_be_set = Some(must_be_set);
        self
    }

    /// Merges the supplied fields over the default record.
    pub fn normalize(self) -> Recipe {
        Recipe {
            class: self.class,
            constructor_attributes: self.constructor_attributes.unwrap_or_default(),
            setter_attributes: self.setter_attributes.unwrap_or_default(),
            use_singleton: self.use_singleton.unwrap_or(true),
            use_lazyload: self.use_lazyload.unwrap_or(false),
            must_be_set: self.must_be_set.unwrap_or(false),
        }
    }
}

/// A normalized configuration entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub class: Option<String>,
    pub constructor_attributes: Vec<Value>,
    pub setter_attributes: IndexMap<String, Value>,
    pub use_singleton: bool,
    pub use_lazyload: bool,
    pub must_be_set: bool,
}

impl Recipe {
    #[inline]
    pub fn scope(&self) -> Scope {
        Scope::from_singleton_flag(self.use_singleton)
    }

    /// Built during container construction rather than on first `get`.
    #[inline]
    pub fn is_eager(&self) -> bool {
        !self.use_lazyload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_applied() {
        let recipe = RawRecipe::new("Mailer").normalize();

        assert_eq!(recipe.class.as_deref(), Some("Mailer"));
        assert!(recipe.constructor_attributes.is_empty());
        assert!(recipe.setter_attributes.is_empty());
        assert!(recipe.use_singleton);
        assert!(!recipe.use_lazyload);
        assert!(!recipe.must_be_set);
        assert!(recipe.is_eager());
        assert_eq!(recipe.scope(), Scope::Singleton);
    }

    #[test]
    fn supplied_fields_win() {
        let recipe = RawRecipe::new("Counter")
            .singleton(false)
            .lazy(true)
            .normalize();

        assert_eq!(recipe.scope(), Scope::Transient);
        assert!(!recipe.is_eager());
    }

    #[test]
    fn placeholder_is_lazy_and_must_be_set() {
        let recipe = RawRecipe::placeholder().normalize();
        assert!(recipe.class.is_none());
        assert!(recipe.must_be_set);
        assert!(recipe.use_lazyload);
    }

    #[test]
    fn setter_attributes_keep_insertion_order() {
        let recipe = RawRecipe::new("Mailer")
            .attr("zeta", 1)
            .attr("alpha", 2)
            .attr("mid", 3)
            .normalize();

        let names: Vec<&str> = recipe.setter_attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn deserialize_partial_entry() {
        let raw: RawRecipe = serde_json::from_value(json!({
            "class": "Counter",
            "constructor_attributes": [10],
            "use_lazyload": true
        }))
        .unwrap();

        assert_eq!(raw.use_singleton, None);
        let recipe = raw.normalize();
        assert_eq!(recipe.constructor_attributes, vec![json!(10)]);
        assert!(recipe.use_singleton);
    }
}
