//! Default records inserted on first startup when a table is otherwise
//! empty of them (matched by `name`), per §6.

use crate::entity::Entity;
use crate::factory;

/// The three default difficulty levels, in ascending order of weight.
pub fn difficulties() -> Vec<Entity> {
    vec![
        factory::difficulty("easy", "Easy", 0.33),
        factory::difficulty("medium", "Medium", 0.66),
        factory::difficulty("hard", "Hard", 1.0),
    ]
}

/// The five default priority levels, in ascending order of weight.
pub fn priorities() -> Vec<Entity> {
    vec![
        factory::priority("lowest", "Lowest", 0.2),
        factory::priority("low", "Low", 0.4),
        factory::priority("medium", "Medium", 0.6),
        factory::priority("high", "High", 0.8),
        factory::priority("highest", "Highest", 1.0),
    ]
}

/// The single default user record.
pub fn default_user() -> Entity {
    factory::user("default", None, None, vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_difficulty_values_match_the_source_constants() {
        let seeds = difficulties();
        assert_eq!(seeds.len(), 3);
        let easy = &seeds[0];
        if let Entity::Difficulty(d) = easy {
            assert_eq!(d.name, "easy");
            assert_eq!(d.display_name, "Easy");
            assert_eq!(d.value, 0.33);
        } else {
            panic!("expected a difficulty entity");
        }
    }

    #[test]
    fn seeded_priorities_have_monotonically_increasing_value() {
        let seeds = priorities();
        let values: Vec<f64> = seeds
            .iter()
            .map(|e| match e {
                Entity::Priority(p) => p.value,
                _ => panic!("expected a priority entity"),
            })
            .collect();
        for pair in values.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
