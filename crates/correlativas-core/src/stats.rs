//! Progress statistics over a plan.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::course::{CourseNode, CourseState};

/// Counts by state plus completion percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    pub total: usize,
    pub approved: usize,
    pub regularized: usize,
    pub available: usize,
    pub blocked: usize,
    /// `round(approved / total * 100)`, 0 for an empty plan.
    pub completion_percent: u8,
}

/// Stats for one academic year of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStats {
    pub level: u8,
    pub stats: PlanStats,
}

impl PlanStats {
    pub fn from_nodes(nodes: &[CourseNode]) -> Self {
        let mut stats = nodes.iter().fold(PlanStats::default(), |mut acc, node| {
            acc.record(node.state);
            acc
        });
        stats.completion_percent = completion_percent(stats.approved, stats.total);
        stats
    }

    /// Per-level breakdown, ordered by level.
    pub fn by_level(nodes: &[CourseNode]) -> Vec<LevelStats> {
        let mut levels: BTreeMap<u8, PlanStats> = BTreeMap::new();
        for node in nodes {
            levels.entry(node.level).or_default().record(node.state);
        }
        levels
            .into_iter()
            .map(|(level, mut stats)| {
                stats.completion_percent = completion_percent(stats.approved, stats.total);
                LevelStats { level, stats }
            })
            .collect()
    }

    pub fn count(&self, state: CourseState) -> usize {
        match state {
            CourseState::Approved => self.approved,
            CourseState::Regularized => self.regularized,
            CourseState::Available => self.available,
            CourseState::Blocked => self.blocked,
        }
    }

    fn record(&mut self, state: CourseState) {
        self.total += 1;
        match state {
            CourseState::Approved => self.approved += 1,
            CourseState::Regularized => self.regularized += 1,
            CourseState::Available => self.available += 1,
            CourseState::Blocked => self.blocked += 1,
        }
    }
}

fn completion_percent(approved: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((approved as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, level: u8, state: CourseState) -> CourseNode {
        CourseNode::new(id, id, level).with_state(state)
    }

    #[test]
    fn empty_plan_has_zero_completion() {
        let stats = PlanStats::from_nodes(&[]);
        assert_eq!(stats, PlanStats::default());
        assert_eq!(stats.completion_percent, 0);
    }

    #[test]
    fn counts_add_up_to_total() {
        let nodes = vec![
            node("1", 1, CourseState::Approved),
            node("2", 1, CourseState::Regularized),
            node("3", 2, CourseState::Available),
            node("4", 2, CourseState::Blocked),
            node("5", 3, CourseState::Blocked),
        ];
        let stats = PlanStats::from_nodes(&nodes);
        assert_eq!(stats.total, 5);
        let sum: usize = CourseState::ALL.iter().map(|s| stats.count(*s)).sum();
        assert_eq!(sum, stats.total);
        assert_eq!(stats.blocked, 2);
        assert_eq!(stats.completion_percent, 20);
    }

    #[test]
    fn completion_rounds_half_up() {
        // 1/3 -> 33, 2/3 -> 67, 1/8 -> 12.5 -> 13
        assert_eq!(completion_percent(1, 3), 33);
        assert_eq!(completion_percent(2, 3), 67);
        assert_eq!(completion_percent(1, 8), 13);
        assert_eq!(completion_percent(36, 36), 100);
    }

    #[test]
    fn by_level_groups_and_orders() {
        let nodes = vec![
            node("3", 2, CourseState::Approved),
            node("1", 1, CourseState::Approved),
            node("2", 1, CourseState::Available),
        ];
        let levels = PlanStats::by_level(&nodes);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].level, 1);
        assert_eq!(levels[0].stats.total, 2);
        assert_eq!(levels[0].stats.completion_percent, 50);
        assert_eq!(levels[1].stats.completion_percent, 100);
    }
}
