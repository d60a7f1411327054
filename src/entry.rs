// 🥕 Entry Model - Ingredients and Recipes
// An entry is identified by its name; the value behind a name never changes
// once registered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry::AddError;

// ============================================================================
// ENTRY TYPES
// ============================================================================

/// Atomic entry: no sub-dependencies, fixed preparation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub cook_time: u64,
}

/// One `(name, quantity)` reference from a recipe to another entry.
///
/// The referenced name does not have to exist when the recipe is added.
/// It is resolved when the recipe is summarized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredItem {
    pub name: String,
    pub quantity: u64,
}

impl RequiredItem {
    pub fn new(name: impl Into<String>, quantity: u64) -> Self {
        RequiredItem {
            name: name.into(),
            quantity,
        }
    }
}

/// Composite entry built from other entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub required_items: Vec<RequiredItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Ingredient,
    Recipe,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Ingredient => "ingredient",
            EntryKind::Recipe => "recipe",
        }
    }
}

// ============================================================================
// ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Ingredient(Ingredient),
    Recipe(Recipe),
}

impl Entry {
    pub fn ingredient(name: impl Into<String>, cook_time: u64) -> Self {
        Entry::Ingredient(Ingredient {
            name: name.into(),
            cook_time,
        })
    }

    pub fn recipe(name: impl Into<String>, required_items: Vec<RequiredItem>) -> Self {
        Entry::Recipe(Recipe {
            name: name.into(),
            required_items,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Ingredient(ingredient) => &ingredient.name,
            Entry::Recipe(recipe) => &recipe.name,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Ingredient(_) => EntryKind::Ingredient,
            Entry::Recipe(_) => EntryKind::Recipe,
        }
    }

    pub fn as_recipe(&self) -> Option<&Recipe> {
        match self {
            Entry::Recipe(recipe) => Some(recipe),
            Entry::Ingredient(_) => None,
        }
    }
}

/// A registered entry plus the moment it was admitted.
#[derive(Debug, Clone)]
pub struct Registered {
    pub entry: Entry,
    pub registered_at: DateTime<Utc>,
}

// ============================================================================
// PAYLOAD PARSING
// ============================================================================

/// Field count of every valid payload: name, type, and one variant field.
const PAYLOAD_FIELDS: usize = 3;
const ITEM_FIELDS: usize = 2;

/// A payload that passed the structural check but not yet the variant rules.
///
/// Parsing is split in two so the registry can reject duplicate names
/// between the structural check and the variant checks.
#[derive(Debug)]
pub struct EntryPayload<'a> {
    pub name: &'a str,
    pub type_: &'a Value,
    fields: &'a Map<String, Value>,
}

impl<'a> EntryPayload<'a> {
    /// Structural check: an object with exactly name, type and one more field.
    pub fn parse(payload: &'a Value) -> Result<Self, AddError> {
        let fields = payload
            .as_object()
            .ok_or_else(|| AddError::malformed("payload must be a JSON object"))?;

        if fields.len() != PAYLOAD_FIELDS {
            return Err(AddError::malformed(format!(
                "expected {} fields, got {}",
                PAYLOAD_FIELDS,
                fields.len()
            )));
        }

        let name = fields
            .get("name")
            .ok_or_else(|| AddError::malformed("missing field `name`"))?
            .as_str()
            .ok_or_else(|| AddError::malformed("field `name` must be a string"))?;

        // Any JSON value passes here; a type that is not a known string is
        // rejected as unknown after the duplicate check.
        let type_ = fields
            .get("type")
            .ok_or_else(|| AddError::malformed("missing field `type`"))?;

        if name.is_empty() {
            return Err(AddError::malformed("field `name` must not be empty"));
        }

        Ok(EntryPayload { name, type_, fields })
    }

    /// Variant rules: recipe items, ingredient cook time, known type.
    pub fn into_entry(self) -> Result<Entry, AddError> {
        match self.type_.as_str() {
            Some("recipe") => self.parse_recipe(),
            Some("ingredient") => self.parse_ingredient(),
            Some(other) => Err(AddError::UnknownType(other.to_string())),
            None => Err(AddError::UnknownType(self.type_.to_string())),
        }
    }

    fn parse_recipe(&self) -> Result<Entry, AddError> {
        let items = match self.fields.get("requiredItems").and_then(Value::as_array) {
            Some(items) if !items.is_empty() => items,
            _ => return Err(AddError::EmptyRequiredItems(self.name.to_string())),
        };

        let required_items = items
            .iter()
            .enumerate()
            .map(|(index, item)| self.parse_item(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Entry::recipe(self.name, required_items))
    }

    fn parse_item(&self, index: usize, item: &Value) -> Result<RequiredItem, AddError> {
        let invalid = |reason: &str| AddError::InvalidRequiredItem {
            recipe: self.name.to_string(),
            index,
            reason: reason.to_string(),
        };

        let fields = item
            .as_object()
            .ok_or_else(|| invalid("item must be a JSON object"))?;

        if fields.len() != ITEM_FIELDS {
            return Err(invalid("item must have exactly `name` and `quantity`"));
        }

        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| invalid("missing or invalid `name`"))?;

        let quantity = fields
            .get("quantity")
            .ok_or_else(|| invalid("missing `quantity`"))?;

        // Zero is accepted; only negative quantities are rejected.
        let quantity = match (quantity.as_u64(), quantity.as_i64()) {
            (Some(quantity), _) => quantity,
            (None, Some(_)) => return Err(invalid("quantity must not be negative")),
            (None, None) => return Err(invalid("quantity must be an integer")),
        };

        Ok(RequiredItem::new(name, quantity))
    }

    fn parse_ingredient(&self) -> Result<Entry, AddError> {
        let invalid = |reason: &str| AddError::InvalidCookTime {
            name: self.name.to_string(),
            reason: reason.to_string(),
        };

        let cook_time = self
            .fields
            .get("cookTime")
            .ok_or_else(|| invalid("missing `cookTime`"))?;

        let cook_time = match (cook_time.as_u64(), cook_time.as_i64()) {
            (Some(cook_time), _) => cook_time,
            (None, Some(_)) => return Err(invalid("cookTime must not be negative")),
            (None, None) => return Err(invalid("cookTime must be an integer")),
        };

        Ok(Entry::ingredient(self.name, cook_time))
    }
}

// ============================================================================
// TESTS
// ============================================================================
