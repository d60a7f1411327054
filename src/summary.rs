// 🧮 Recipe Summary - flatten a recipe tree into base ingredients
//
// Walks the recipe graph depth-first, multiplying quantities on the way down
// and folding every ingredient reached into a single running total.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::entry::{Entry, Ingredient, Recipe};
use crate::registry::{Registry, Snapshot};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("no entry named '{0}'")]
    NotFound(String),

    #[error("'{0}' is an ingredient, not a recipe")]
    NotARecipe(String),

    #[error("recipe '{recipe}' requires '{item}', which is not registered")]
    UnresolvedReference { recipe: String, item: String },

    #[error("cyclic dependency: {}", .path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    #[error("quantities required by recipe '{0}' overflow")]
    Overflow(String),
}

impl SummaryError {
    /// Stable identifier of the failure, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SummaryError::NotFound(_) => "not_found",
            SummaryError::NotARecipe(_) => "not_a_recipe",
            SummaryError::UnresolvedReference { .. } => "unresolved_reference",
            SummaryError::CyclicDependency { .. } => "cyclic_dependency",
            SummaryError::Overflow(_) => "overflow",
        }
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientQuantity {
    pub name: String,
    pub quantity: u64,
}

/// Fully expanded view of one recipe.
///
/// `ingredients` lists every base ingredient once, in the order it was first
/// reached. Callers must not rely on that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub name: String,
    pub cook_time: u64,
    pub ingredients: Vec<IngredientQuantity>,
}

impl Summary {
    pub fn quantity_of(&self, ingredient: &str) -> Option<u64> {
        self.ingredients
            .iter()
            .find(|i| i.name == ingredient)
            .map(|i| i.quantity)
    }
}

/// Cook time and ingredient quantities for one unit of a recipe.
#[derive(Debug, Default)]
struct Totals {
    cook_time: u64,
    ingredients: Vec<IngredientQuantity>,
    index: HashMap<String, usize>,
}

impl Totals {
    fn add_ingredient(&mut self, ingredient: &Ingredient, quantity: u64, recipe: &str) -> Result<(), SummaryError> {
        let time = ingredient
            .cook_time
            .checked_mul(quantity)
            .ok_or_else(|| SummaryError::Overflow(recipe.to_string()))?;

        self.add(&ingredient.name, quantity, time, recipe)
    }

    /// Fold `factor` units of an already expanded sub-recipe into these totals.
    fn add_scaled(&mut self, unit: &Totals, factor: u64, recipe: &str) -> Result<(), SummaryError> {
        let overflow = || SummaryError::Overflow(recipe.to_string());

        let time = unit.cook_time.checked_mul(factor).ok_or_else(overflow)?;
        self.cook_time = self.cook_time.checked_add(time).ok_or_else(overflow)?;

        for ingredient in &unit.ingredients {
            let quantity = ingredient.quantity.checked_mul(factor).ok_or_else(overflow)?;
            self.add(&ingredient.name, quantity, 0, recipe)?;
        }
        Ok(())
    }

    fn add(&mut self, name: &str, quantity: u64, time: u64, recipe: &str) -> Result<(), SummaryError> {
        let overflow = || SummaryError::Overflow(recipe.to_string());

        self.cook_time = self.cook_time.checked_add(time).ok_or_else(overflow)?;

        match self.index.get(name) {
            Some(&slot) => {
                let total = &mut self.ingredients[slot].quantity;
                *total = total.checked_add(quantity).ok_or_else(overflow)?;
            }
            None => {
                self.index.insert(name.to_string(), self.ingredients.len());
                self.ingredients.push(IngredientQuantity {
                    name: name.to_string(),
                    quantity,
                });
            }
        }
        Ok(())
    }

    fn into_summary(self, name: &str) -> Summary {
        Summary {
            name: name.to_string(),
            cook_time: self.cook_time,
            ingredients: self.ingredients,
        }
    }
}

// ============================================================================
// EXPANSION
// ============================================================================

/// One recipe being expanded: the next item to fold in and the totals so far.
struct Frame<'a> {
    recipe: &'a Recipe,
    next: usize,
    totals: Totals,
}

impl<'a> Frame<'a> {
    fn new(recipe: &'a Recipe) -> Self {
        Frame {
            recipe,
            next: 0,
            totals: Totals::default(),
        }
    }
}

/// Summarize a recipe against a consistent view of the registry.
///
/// The read lock is held for the whole walk, so the result reflects exactly
/// the entries whose `add` completed before the call.
pub fn summarize(registry: &Registry, name: &str) -> Result<Summary, SummaryError> {
    let snapshot = registry.snapshot();

    let root = match snapshot.get(name) {
        Some(Entry::Recipe(recipe)) => recipe,
        Some(Entry::Ingredient(_)) => return Err(SummaryError::NotARecipe(name.to_string())),
        None => return Err(SummaryError::NotFound(name.to_string())),
    };

    let totals = expand(&snapshot, root)?;
    Ok(totals.into_summary(name))
}

/// Depth-first expansion on an explicit stack.
///
/// Each recipe is expanded once per call: its per-unit totals are kept in
/// `expanded` and scaled by the quantity at every later reference, so the
/// work grows with the number of entries rather than the number of paths.
///
/// `in_progress` holds exactly the recipes on the stack; meeting one of them
/// again means the graph loops back on the current path.
fn expand<'a>(snapshot: &'a Snapshot<'_>, root: &'a Recipe) -> Result<Totals, SummaryError> {
    let mut stack = vec![Frame::new(root)];
    let mut in_progress: HashSet<&'a str> = HashSet::from([root.name.as_str()]);
    let mut expanded: HashMap<&'a str, Totals> = HashMap::new();

    while let Some(frame) = stack.last_mut() {
        let recipe: &'a Recipe = frame.recipe;

        let Some(item) = recipe.required_items.get(frame.next) else {
            let totals = std::mem::take(&mut frame.totals);
            stack.pop();
            if stack.is_empty() {
                return Ok(totals);
            }
            in_progress.remove(recipe.name.as_str());
            expanded.insert(recipe.name.as_str(), totals);
            continue;
        };

        match snapshot.get(&item.name) {
            None => {
                return Err(SummaryError::UnresolvedReference {
                    recipe: recipe.name.clone(),
                    item: item.name.clone(),
                });
            }
            Some(Entry::Ingredient(ingredient)) => {
                frame.totals.add_ingredient(ingredient, item.quantity, &recipe.name)?;
            }
            Some(Entry::Recipe(sub)) => {
                if let Some(unit) = expanded.get(sub.name.as_str()) {
                    frame.totals.add_scaled(unit, item.quantity, &recipe.name)?;
                } else if in_progress.insert(sub.name.as_str()) {
                    // Same item is revisited once `sub` is expanded.
                    stack.push(Frame::new(sub));
                    continue;
                } else {
                    let mut path: Vec<String> = stack.iter().map(|f| f.recipe.name.clone()).collect();
                    path.push(sub.name.clone());
                    return Err(SummaryError::CyclicDependency { path });
                }
            }
        }

        frame.next += 1;
    }

    Ok(Totals::default())
}

impl Registry {
    /// Shorthand for [`summarize`].
    pub fn summarize(&self, name: &str) -> Result<Summary, SummaryError> {
        summarize(self, name)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::RequiredItem;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn item(name: &str, quantity: u64) -> RequiredItem {
        RequiredItem::new(name, quantity)
    }

    fn sorted(summary: &Summary) -> Vec<(String, u64)> {
        let mut pairs: Vec<(String, u64)> = summary
            .ingredients
            .iter()
            .map(|i| (i.name.clone(), i.quantity))
            .collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn test_omelette() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Egg", 5)).unwrap();
        registry.insert(Entry::recipe("Omelette", vec![item("Egg", 2)])).unwrap();

        let summary = registry.summarize("Omelette").unwrap();

        assert_eq!(summary.name, "Omelette");
        assert_eq!(summary.cook_time, 10);
        assert_eq!(sorted(&summary), vec![("Egg".to_string(), 2)]);
    }

    #[test]
    fn test_diamond_dependency_sums_both_paths() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Flour", 1)).unwrap();
        registry.insert(Entry::recipe("Dough", vec![item("Flour", 2)])).unwrap();
        registry
            .insert(Entry::recipe("Pizza", vec![item("Dough", 1), item("Flour", 1)]))
            .unwrap();

        let summary = registry.summarize("Pizza").unwrap();

        assert_eq!(summary.quantity_of("Flour"), Some(3));
        assert_eq!(summary.ingredients.len(), 1);
        assert_eq!(summary.cook_time, 3);
    }

    #[test]
    fn test_every_required_item_is_processed() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Egg", 5)).unwrap();
        registry.insert(Entry::ingredient("Milk", 1)).unwrap();
        registry.insert(Entry::ingredient("Cheese", 2)).unwrap();
        registry
            .insert(Entry::recipe(
                "Omelette",
                vec![item("Egg", 3), item("Milk", 1), item("Cheese", 2)],
            ))
            .unwrap();

        let summary = registry.summarize("Omelette").unwrap();

        assert_eq!(
            sorted(&summary),
            vec![
                ("Cheese".to_string(), 2),
                ("Egg".to_string(), 3),
                ("Milk".to_string(), 1),
            ]
        );
        assert_eq!(summary.cook_time, 3 * 5 + 1 + 2 * 2);
    }

    #[test]
    fn test_nested_multipliers() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Flour", 1)).unwrap();
        registry.insert(Entry::ingredient("Yeast", 2)).unwrap();
        registry
            .insert(Entry::recipe("Dough", vec![item("Flour", 2), item("Yeast", 1)]))
            .unwrap();
        registry
            .insert(Entry::recipe("Pizza", vec![item("Dough", 3), item("Flour", 1)]))
            .unwrap();
        registry.insert(Entry::recipe("Party", vec![item("Pizza", 2)])).unwrap();

        let pizza = registry.summarize("Pizza").unwrap();
        assert_eq!(pizza.quantity_of("Flour"), Some(7));
        assert_eq!(pizza.quantity_of("Yeast"), Some(3));
        assert_eq!(pizza.cook_time, 7 + 3 * 2);

        let party = registry.summarize("Party").unwrap();
        assert_eq!(party.quantity_of("Flour"), Some(14));
        assert_eq!(party.quantity_of("Yeast"), Some(6));
        assert_eq!(party.cook_time, 26);
    }

    #[test]
    fn test_repeated_sub_recipe_is_not_a_cycle() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Bread", 2)).unwrap();
        registry.insert(Entry::recipe("Toast", vec![item("Bread", 1)])).unwrap();
        registry
            .insert(Entry::recipe("Breakfast", vec![item("Toast", 2), item("Toast", 1)]))
            .unwrap();

        let summary = registry.summarize("Breakfast").unwrap();
        assert_eq!(summary.quantity_of("Bread"), Some(3));
        assert_eq!(summary.cook_time, 6);
    }

    #[test]
    fn test_ingredients_in_first_reached_order() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Basil", 0)).unwrap();
        registry.insert(Entry::ingredient("Tomato", 4)).unwrap();
        registry
            .insert(Entry::recipe("Sauce", vec![item("Tomato", 2), item("Basil", 1)]))
            .unwrap();

        let summary = registry.summarize("Sauce").unwrap();
        let names: Vec<&str> = summary.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Tomato", "Basil"]);
    }

    #[test]
    fn test_zero_quantity_item_listed_with_zero() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Parsley", 3)).unwrap();
        registry.insert(Entry::ingredient("Potato", 10)).unwrap();
        registry
            .insert(Entry::recipe("Mash", vec![item("Potato", 2), item("Parsley", 0)]))
            .unwrap();

        let summary = registry.summarize("Mash").unwrap();
        assert_eq!(summary.quantity_of("Parsley"), Some(0));
        assert_eq!(summary.cook_time, 20);
    }

    #[test]
    fn test_summarize_ingredient_is_not_a_recipe() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Egg", 5)).unwrap();

        let err = registry.summarize("Egg").unwrap_err();
        assert_eq!(err, SummaryError::NotARecipe("Egg".to_string()));
    }

    #[test]
    fn test_summarize_unknown_name() {
        let registry = Registry::new();
        let err = registry.summarize("Omelette").unwrap_err();
        assert_eq!(err, SummaryError::NotFound("Omelette".to_string()));
    }

    #[test]
    fn test_unresolved_reference() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Egg", 5)).unwrap();
        registry
            .insert(Entry::recipe("Omelette", vec![item("Egg", 2), item("Truffle", 1)]))
            .unwrap();

        let err = registry.summarize("Omelette").unwrap_err();
        assert_eq!(
            err,
            SummaryError::UnresolvedReference {
                recipe: "Omelette".to_string(),
                item: "Truffle".to_string(),
            }
        );
    }

    #[test]
    fn test_unresolved_reference_in_nested_recipe() {
        let registry = Registry::new();
        registry.insert(Entry::recipe("Dough", vec![item("Flour", 2)])).unwrap();
        registry.insert(Entry::recipe("Pizza", vec![item("Dough", 1)])).unwrap();

        let err = registry.summarize("Pizza").unwrap_err();
        assert!(matches!(
            err,
            SummaryError::UnresolvedReference { ref recipe, ref item } if recipe == "Dough" && item == "Flour"
        ));
    }

    #[test]
    fn test_two_recipe_cycle() {
        let registry = Registry::new();
        registry.insert(Entry::recipe("A", vec![item("B", 1)])).unwrap();
        registry.insert(Entry::recipe("B", vec![item("A", 1)])).unwrap();

        let err = registry.summarize("A").unwrap_err();
        assert_eq!(
            err,
            SummaryError::CyclicDependency {
                path: vec!["A".to_string(), "B".to_string(), "A".to_string()],
            }
        );
    }

    #[test]
    fn test_self_cycle() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Water", 1)).unwrap();
        registry
            .insert(Entry::recipe("Stock", vec![item("Water", 1), item("Stock", 1)]))
            .unwrap();

        let err = registry.summarize("Stock").unwrap_err();
        assert_eq!(err.kind(), "cyclic_dependency");
    }

    #[test]
    fn test_cycle_below_the_root() {
        let registry = Registry::new();
        registry.insert(Entry::recipe("Root", vec![item("B", 1)])).unwrap();
        registry.insert(Entry::recipe("B", vec![item("C", 1)])).unwrap();
        registry.insert(Entry::recipe("C", vec![item("B", 1)])).unwrap();

        let err = registry.summarize("Root").unwrap_err();
        assert_eq!(
            err,
            SummaryError::CyclicDependency {
                path: vec!["Root".into(), "B".into(), "C".into(), "B".into()],
            }
        );
        assert_eq!(err.to_string(), "cyclic dependency: Root -> B -> C -> B");
    }

    #[test]
    fn test_deep_chain_does_not_exhaust_stack() {
        let registry = Registry::new();
        let depth = 50_000;

        registry.insert(Entry::ingredient("Grain", 1)).unwrap();
        registry.insert(Entry::recipe("Level 0", vec![item("Grain", 1)])).unwrap();
        for level in 1..depth {
            registry
                .insert(Entry::recipe(
                    format!("Level {}", level),
                    vec![item(&format!("Level {}", level - 1), 1)],
                ))
                .unwrap();
        }

        let summary = registry.summarize(&format!("Level {}", depth - 1)).unwrap();
        assert_eq!(summary.quantity_of("Grain"), Some(1));
        assert_eq!(summary.cook_time, 1);
    }

    #[test]
    fn test_shared_sub_recipes_expand_once() {
        // Level n requires Level n-1 twice: 2^n paths reach Salt from the top
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Salt", 1)).unwrap();
        registry.insert(Entry::recipe("Level 0", vec![item("Salt", 1)])).unwrap();
        for level in 1..=63 {
            let below = format!("Level {}", level - 1);
            registry
                .insert(Entry::recipe(
                    format!("Level {}", level),
                    vec![item(&below, 1), item(&below, 1)],
                ))
                .unwrap();
        }

        let summary = registry.summarize("Level 63").unwrap();
        assert_eq!(summary.quantity_of("Salt"), Some(1 << 63));
        assert_eq!(summary.cook_time, 1 << 63);

        registry
            .insert(Entry::recipe("Level 64", vec![item("Level 63", 1), item("Level 63", 1)]))
            .unwrap();
        let err = registry.summarize("Level 64").unwrap_err();
        assert_eq!(err, SummaryError::Overflow("Level 64".to_string()));
    }

    #[test]
    fn test_shared_sub_recipe_scaled_per_reference() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Flour", 1)).unwrap();
        registry.insert(Entry::ingredient("Water", 2)).unwrap();
        registry
            .insert(Entry::recipe("Dough", vec![item("Flour", 3), item("Water", 1)]))
            .unwrap();
        registry.insert(Entry::recipe("Loaf", vec![item("Dough", 2)])).unwrap();
        registry
            .insert(Entry::recipe("Bakery", vec![item("Loaf", 5), item("Dough", 1), item("Loaf", 1)]))
            .unwrap();

        let summary = registry.summarize("Bakery").unwrap();
        // Dough units: 5*2 + 1 + 1*2 = 13
        assert_eq!(summary.quantity_of("Flour"), Some(39));
        assert_eq!(summary.quantity_of("Water"), Some(13));
        assert_eq!(summary.cook_time, 13 * (3 + 2));
    }

    #[test]
    fn test_summaries_alongside_adds_see_whole_entries() {
        let registry = Arc::new(Registry::new());
        registry.insert(Entry::ingredient("Milk", 1)).unwrap();
        registry
            .insert(Entry::recipe("Pancake", vec![item("Egg", 2), item("Milk", 3)]))
            .unwrap();

        let barrier = Arc::new(Barrier::new(9));

        let summarizers: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    (0..500).map(|_| registry.summarize("Pancake")).collect::<Vec<_>>()
                })
            })
            .collect();

        let adder = {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..50 {
                    registry.insert(Entry::ingredient(format!("Spice {}", i), i)).unwrap();
                }
                registry
                    .add(&serde_json::json!({"type": "ingredient", "name": "Egg", "cookTime": 4}))
                    .unwrap();
            })
        };

        adder.join().unwrap();

        for handle in summarizers {
            for result in handle.join().unwrap() {
                match result {
                    Ok(summary) => {
                        assert_eq!(sorted(&summary), vec![("Egg".to_string(), 2), ("Milk".to_string(), 3)]);
                        assert_eq!(summary.cook_time, 2 * 4 + 3);
                    }
                    Err(err) => assert_eq!(
                        err,
                        SummaryError::UnresolvedReference {
                            recipe: "Pancake".to_string(),
                            item: "Egg".to_string(),
                        }
                    ),
                }
            }
        }

        assert_eq!(registry.summarize("Pancake").unwrap().cook_time, 11);
    }

    #[test]
    fn test_overflow_is_reported() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Rice", 2)).unwrap();
        registry
            .insert(Entry::recipe("Feast", vec![item("Rice", u64::MAX)]))
            .unwrap();

        let err = registry.summarize("Feast").unwrap_err();
        assert_eq!(err, SummaryError::Overflow("Feast".to_string()));
    }

    #[test]
    fn test_summaries_are_idempotent() {
        let registry = Registry::new();
        registry.insert(Entry::ingredient("Flour", 1)).unwrap();
        registry.insert(Entry::ingredient("Water", 0)).unwrap();
        registry
            .insert(Entry::recipe("Dough", vec![item("Flour", 2), item("Water", 1)]))
            .unwrap();
        registry
            .insert(Entry::recipe("Bread", vec![item("Dough", 2), item("Flour", 1)]))
            .unwrap();

        let first = registry.summarize("Bread").unwrap();
        let second = registry.summarize("Bread").unwrap();

        assert_eq!(first.cook_time, second.cook_time);
        assert_eq!(sorted(&first), sorted(&second));
    }

    #[test]
    fn test_summary_serializes_in_wire_shape() {
        let summary = Summary {
            name: "Omelette".to_string(),
            cook_time: 10,
            ingredients: vec![IngredientQuantity {
                name: "Egg".to_string(),
                quantity: 2,
            }],
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Omelette",
                "cookTime": 10,
                "ingredients": [{"name": "Egg", "quantity": 2}]
            })
        );
    }
}
