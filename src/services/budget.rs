use crate::models::{ActivityLevel, BudgetVerdict, Goal, MealClassification, Sex, UserProfile};

/// Age is not collected; the Mifflin-St Jeor term uses a fixed reference.
const REFERENCE_AGE_YEARS: f64 = 30.0;

/// Remaining allowance below this counts as "near" the budget.
const NEAR_BUDGET_MARGIN_KCAL: i64 = 200;

/// One multiplier per activity level (the 1.55 "active" value is the
/// moderate-exercise point of the usual 1.55-1.725 band).
fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Active => 1.55,
        ActivityLevel::VeryActive => 1.9,
    }
}

/// Fixed additive goal offsets, chosen over the multiplicative ±15%
/// variant; see DESIGN.md.
fn goal_adjustment(goal: Goal) -> i64 {
    match goal {
        Goal::Lose => -500,
        Goal::Maintain => 0,
        Goal::Gain => 500,
    }
}

/// Mifflin-St Jeor basal rate at the reference age.
fn basal_metabolic_rate(profile: &UserProfile) -> f64 {
    let sex_constant = match profile.sex {
        Sex::Male => 5.0,
        Sex::Female => -161.0,
    };
    10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * REFERENCE_AGE_YEARS + sex_constant
}

/// Daily calorie allowance: BMR, activity multiplier, goal offset.
/// Deterministic for a given profile.
pub fn daily_calorie_budget(profile: &UserProfile) -> i64 {
    let tdee = basal_metabolic_rate(profile) * activity_multiplier(profile.activity_level);
    tdee.round() as i64 + goal_adjustment(profile.goal)
}

/// Classify one meal against what remains of today's allowance.
pub fn classify_meal(budget: i64, today_total: i64, meal_calories: i64) -> MealClassification {
    let remaining = budget - today_total - meal_calories;
    if remaining < 0 {
        MealClassification::Over
    } else if remaining < NEAR_BUDGET_MARGIN_KCAL {
        MealClassification::Near
    } else {
        MealClassification::Under
    }
}

pub fn verdict(profile: &UserProfile, today_total: i64, meal_calories: i64) -> BudgetVerdict {
    let budget = daily_calorie_budget(profile);
    BudgetVerdict {
        daily_calorie_budget: budget,
        classification: classify_meal(budget, today_total, meal_calories),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(sex: Sex, activity: ActivityLevel, goal: Goal) -> UserProfile {
        UserProfile {
            weight_kg: 80.0,
            height_cm: 180.0,
            sex,
            activity_level: activity,
            goal,
        }
    }

    #[test]
    fn test_reference_scenario() {
        // BMR = 10*80 + 6.25*180 - 5*30 + 5 = 1805
        let p = profile(Sex::Male, ActivityLevel::Sedentary, Goal::Maintain);
        assert_eq!(basal_metabolic_rate(&p), 1805.0);
        // budget = round(1805 * 1.2) + 0
        assert_eq!(daily_calorie_budget(&p), 2166);
    }

    #[test]
    fn test_female_constant() {
        let p = profile(Sex::Female, ActivityLevel::Sedentary, Goal::Maintain);
        assert_eq!(basal_metabolic_rate(&p), 1639.0);
    }

    #[test]
    fn test_goal_offsets_are_additive() {
        let maintain = daily_calorie_budget(&profile(Sex::Male, ActivityLevel::Active, Goal::Maintain));
        let lose = daily_calorie_budget(&profile(Sex::Male, ActivityLevel::Active, Goal::Lose));
        let gain = daily_calorie_budget(&profile(Sex::Male, ActivityLevel::Active, Goal::Gain));

        assert_eq!(lose, maintain - 500);
        assert_eq!(gain, maintain + 500);
    }

    #[test]
    fn test_budget_is_deterministic() {
        let p = profile(Sex::Female, ActivityLevel::VeryActive, Goal::Gain);
        assert_eq!(daily_calorie_budget(&p), daily_calorie_budget(&p));
    }

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(classify_meal(2000, 0, 500), MealClassification::Under);
        assert_eq!(classify_meal(2000, 1500, 350), MealClassification::Near);
        assert_eq!(classify_meal(2000, 1500, 501), MealClassification::Over);
        // Exactly at budget: zero remaining is still not over.
        assert_eq!(classify_meal(2000, 1500, 500), MealClassification::Near);
    }
}
