use crate::schema::{cart_entries, ingredients, recipe_ingredients, recipes, users};
use diesel::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("user not found")]
    UnknownUser,

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}

/// One ingredient line fetched from a carted recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// One row of the aggregated shopping list: the total amount needed of a
/// given (name, measurement_unit) pair across every carted recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedLine {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Group ingredient lines by exact (name, measurement_unit) and sum amounts.
///
/// Keys match case-sensitively with no unit conversion: "g" and "kg" of the
/// same ingredient stay separate lines. Output is ordered by ingredient name
/// (ordinal, locale-agnostic), ties broken by measurement unit, so repeated
/// calls over the same data produce identical output. Sums accumulate in
/// i64, so no i32 line set can overflow the total.
pub fn aggregate_lines(lines: impl IntoIterator<Item = IngredientLine>) -> Vec<AggregatedLine> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();

    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_insert(0) += i64::from(line.amount);
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| AggregatedLine {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}

/// Aggregate the shopping list for a user's current cart.
///
/// An empty cart is a valid input and yields an empty list; an unknown
/// user id fails with [`AggregateError::UnknownUser`].
pub fn aggregate_for_user(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> Result<Vec<AggregatedLine>, AggregateError> {
    users::table
        .find(user_id)
        .select(users::id)
        .first::<Uuid>(conn)
        .optional()?
        .ok_or(AggregateError::UnknownUser)?;

    let rows: Vec<(String, String, i32)> = cart_entries::table
        .inner_join(
            recipes::table.inner_join(recipe_ingredients::table.inner_join(ingredients::table)),
        )
        .filter(cart_entries::user_id.eq(user_id))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;

    Ok(aggregate_lines(rows.into_iter().map(
        |(name, measurement_unit, amount)| IngredientLine {
            name,
            measurement_unit,
            amount,
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, unit: &str, amount: i32) -> IngredientLine {
        IngredientLine {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(aggregate_lines(vec![]).is_empty());
    }

    #[test]
    fn test_two_recipe_cart_scenario() {
        // Recipe A: 200g flour, 2 eggs. Recipe B: 300g flour, 100ml milk.
        let lines = vec![
            line("Flour", "g", 200),
            line("Egg", "pcs", 2),
            line("Flour", "g", 300),
            line("Milk", "ml", 100),
        ];

        let aggregated = aggregate_lines(lines);

        assert_eq!(
            aggregated,
            vec![
                AggregatedLine {
                    name: "Egg".to_string(),
                    measurement_unit: "pcs".to_string(),
                    total_amount: 2,
                },
                AggregatedLine {
                    name: "Flour".to_string(),
                    measurement_unit: "g".to_string(),
                    total_amount: 500,
                },
                AggregatedLine {
                    name: "Milk".to_string(),
                    measurement_unit: "ml".to_string(),
                    total_amount: 100,
                },
            ]
        );
    }

    #[test]
    fn test_same_name_different_unit_stays_separate() {
        let aggregated = aggregate_lines(vec![line("Sugar", "g", 500), line("Sugar", "kg", 1)]);

        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated[0].measurement_unit, "g");
        assert_eq!(aggregated[0].total_amount, 500);
        assert_eq!(aggregated[1].measurement_unit, "kg");
        assert_eq!(aggregated[1].total_amount, 1);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let aggregated = aggregate_lines(vec![line("salt", "g", 5), line("Salt", "g", 5)]);

        assert_eq!(aggregated.len(), 2);
        // Ordinal ordering puts uppercase before lowercase
        assert_eq!(aggregated[0].name, "Salt");
        assert_eq!(aggregated[1].name, "salt");
    }

    #[test]
    fn test_sum_is_exact_over_many_lines() {
        let lines: Vec<IngredientLine> = (0..1000).map(|_| line("Rice", "g", 3)).collect();

        let aggregated = aggregate_lines(lines);

        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].total_amount, 3000);
    }

    #[test]
    fn test_sum_does_not_overflow_i32() {
        let lines = vec![line("Water", "ml", i32::MAX), line("Water", "ml", i32::MAX)];

        let aggregated = aggregate_lines(lines);

        assert_eq!(aggregated[0].total_amount, 2 * i64::from(i32::MAX));
    }

    #[test]
    fn test_ordering_is_deterministic() {
        let lines = vec![
            line("Carrot", "pcs", 3),
            line("Apple", "pcs", 1),
            line("Banana", "pcs", 2),
        ];

        let first = aggregate_lines(lines.clone());
        let second = aggregate_lines(lines);

        assert_eq!(first, second);
        let names: Vec<&str> = first.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Banana", "Carrot"]);
    }
}
