//! Condition scheduler
//!
//! Decides which conditions a resource should show at a given age. For every
//! condition type the winning rule is the eligible one (`delay <= age`) with
//! the largest delay: the most recent transition that should already have
//! happened. Rules with the same maximal delay are resolved in favour of the
//! one listed last.
//!
//! Pure and deterministic: no I/O, no clock reads except in [`resolve`].

use crate::models::{Condition, ConditionRule};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// Index of the winning rule for every condition type that has one
///
/// Indices are returned in the order their condition type first becomes
/// eligible while scanning `rules` front to back. Types whose rules are all
/// still in the future are absent.
pub fn select(rules: &[ConditionRule], age: Duration) -> Vec<usize> {
    let mut winners: Vec<usize> = Vec::new();
    let mut slot_by_type: HashMap<&str, usize> = HashMap::new();

    for (index, rule) in rules.iter().enumerate() {
        if rule.delay > age {
            continue;
        }

        match slot_by_type.get(rule.condition_type.as_str()) {
            Some(&slot) => {
                // Equal delays: the later rule overrides the earlier one
                if rule.delay >= rules[winners[slot]].delay {
                    winners[slot] = index;
                }
            }
            None => {
                slot_by_type.insert(rule.condition_type.as_str(), winners.len());
                winners.push(index);
            }
        }
    }

    winners
}

/// Resolve the conditions due at `age`, stamped with transition time `now`
pub fn resolve_at(rules: &[ConditionRule], age: Duration, now: DateTime<Utc>) -> Vec<Condition> {
    select(rules, age)
        .into_iter()
        .map(|index| {
            let rule = &rules[index];
            Condition {
                condition_type: rule.condition_type.clone(),
                status: rule.condition_status,
                last_transition_time: now,
                reason: rule.reason.clone(),
                message: None,
            }
        })
        .collect()
}

/// Resolve the conditions due at `age`, stamped with the current time
pub fn resolve(rules: &[ConditionRule], age: Duration) -> Vec<Condition> {
    resolve_at(rules, age, Utc::now())
}
