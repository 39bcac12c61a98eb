use super::*;
use crate::course::{CourseId, CourseNode, CourseState};

fn state_of(nodes: &[CourseNode], id: &str) -> CourseState {
    nodes
        .iter()
        .find(|n| n.id.as_str() == id)
        .map(|n| n.state)
        .unwrap()
}

fn chain(len: usize) -> Vec<CourseNode> {
    let mut nodes = vec![CourseNode::new("0", "Course 0", 1).with_state(CourseState::Approved)];
    for i in 1..len {
        nodes.push(
            CourseNode::new(i.to_string(), format!("Course {i}"), 2)
                .with_state(CourseState::Blocked)
                .requiring_approved([(i - 1).to_string()]),
        );
    }
    nodes
}

#[test]
fn level_one_courses_are_never_blocked() {
    let nodes = vec![
        CourseNode::new("1", "Álgebra", 1).with_state(CourseState::Blocked),
        CourseNode::new("2", "Física I", 1)
            .with_state(CourseState::Available)
            .requiring_approved(["missing"]),
    ];
    let out = CascadeEngine::new().recompute(&nodes);
    assert_eq!(state_of(&out, "1"), CourseState::Available);
    assert_eq!(state_of(&out, "2"), CourseState::Available);
}

#[test]
fn terminal_states_survive_unsatisfied_prerequisites() {
    let nodes = vec![
        CourseNode::new("1", "A", 1),
        CourseNode::new("2", "B", 2)
            .with_state(CourseState::Approved)
            .requiring_approved(["1"]),
        CourseNode::new("3", "C", 2)
            .with_state(CourseState::Regularized)
            .requiring_regularized(["1"]),
    ];
    let out = CascadeEngine::new().recompute(&nodes);
    assert_eq!(state_of(&out, "2"), CourseState::Approved);
    assert_eq!(state_of(&out, "3"), CourseState::Regularized);
}

#[test]
fn available_course_is_blocked_when_prerequisites_unmet() {
    let nodes = vec![
        CourseNode::new("1", "A", 1),
        CourseNode::new("2", "B", 2).requiring_regularized(["1"]),
    ];
    let out = CascadeEngine::new().recompute(&nodes);
    assert_eq!(state_of(&out, "2"), CourseState::Blocked);
}

#[test]
fn regularized_satisfies_only_regularized_edges() {
    let nodes = vec![
        CourseNode::new("1", "A", 1),
        CourseNode::new("2", "B", 2).requiring_regularized(["1"]),
        CourseNode::new("3", "C", 2)
            .with_state(CourseState::Blocked)
            .requiring_approved(["1"]),
    ];
    let engine = CascadeEngine::new();
    let out = engine.apply_manual_transition(&nodes, &CourseId::from("1"), CourseState::Regularized);
    let out = engine.recompute(&out);
    assert_eq!(state_of(&out, "1"), CourseState::Regularized);
    assert_eq!(state_of(&out, "2"), CourseState::Available);
    assert_eq!(state_of(&out, "3"), CourseState::Blocked);
}

#[test]
fn two_hop_chain_unlocks() {
    let nodes = vec![
        CourseNode::new("1", "A", 1).with_state(CourseState::Approved),
        CourseNode::new("2", "B", 2)
            .with_state(CourseState::Blocked)
            .requiring_approved(["1"]),
        CourseNode::new("3", "C", 3)
            .with_state(CourseState::Blocked)
            .requiring_regularized(["2"]),
    ];
    let engine = CascadeEngine::new();
    let out = engine.recompute(&nodes);
    assert_eq!(state_of(&out, "2"), CourseState::Available);
    assert_eq!(state_of(&out, "3"), CourseState::Blocked);

    let out = engine.apply_manual_transition(&out, &CourseId::from("2"), CourseState::Regularized);
    assert_eq!(state_of(&out, "3"), CourseState::Available);
}

#[test]
fn downgrading_a_prerequisite_keeps_completed_dependents() {
    // Course 0 approved, everything else starts available.
    let nodes = vec![
        CourseNode::new("0", "A", 1).with_state(CourseState::Approved),
        CourseNode::new("1", "B", 2).requiring_approved(["0"]),
        CourseNode::new("2", "C", 3).requiring_regularized(["1"]),
        CourseNode::new("3", "D", 4).requiring_approved(["2"]),
    ];
    let engine = CascadeEngine::new();
    let out = engine.apply_manual_transition(&nodes, &CourseId::from("1"), CourseState::Regularized);
    assert_eq!(state_of(&out, "2"), CourseState::Available);
    assert_eq!(state_of(&out, "3"), CourseState::Blocked);

    let out = engine.apply_manual_transition(&out, &CourseId::from("0"), CourseState::Available);
    // 1 stays regularized: completed work is never revoked.
    assert_eq!(state_of(&out, "1"), CourseState::Regularized);
    assert_eq!(state_of(&out, "2"), CourseState::Available);
}

#[test]
fn only_direct_dependents_of_terminal_courses_unlock() {
    let nodes = chain(8);
    let (out, report) = CascadeEngine::new().recompute_with_report(&nodes);
    assert_eq!(state_of(&out, "1"), CourseState::Available);
    assert_eq!(state_of(&out, "2"), CourseState::Blocked);
    assert!(report.converged);
    assert_eq!(report.changed, vec![CourseId::from("1")]);
}

#[test]
fn deep_chain_blocks_regardless_of_list_order() {
    let mut nodes: Vec<CourseNode> = chain(7)
        .into_iter()
        .map(|n| n.with_state(CourseState::Available))
        .collect();
    nodes[0].state = CourseState::Approved;
    nodes[1].state = CourseState::Approved;
    nodes[2].requires_approved = vec![CourseId::from("missing")];

    let engine = CascadeEngine::new();
    let forward = engine.recompute(&nodes);
    nodes.reverse();
    let (backward, report) = engine.recompute_with_report(&nodes);

    for id in ["2", "3", "4", "5", "6"] {
        assert_eq!(state_of(&forward, id), CourseState::Blocked, "course {id}");
        assert_eq!(state_of(&backward, id), CourseState::Blocked, "course {id}");
    }
    assert!(report.converged);
}

#[test]
fn fixed_pass_budget_is_clamped_and_reported() {
    let nodes = chain(4)
        .into_iter()
        .map(|n| n.with_state(CourseState::Available))
        .collect::<Vec<_>>();

    let engine = CascadeEngine::with_config(CascadeConfig::new().with_fixed_passes(0));
    assert_eq!(engine.config().passes_for(&nodes), 1);
    let (out, report) = engine.recompute_with_report(&nodes);
    assert_eq!(report.passes, 1);
    assert!(report.converged);
    assert_eq!(state_of(&out, "1"), CourseState::Blocked);

    let legacy =
        CascadeEngine::with_config(CascadeConfig::new().with_fixed_passes(LEGACY_FIXED_PASSES));
    assert_eq!(legacy.recompute(&nodes), out);
}

#[test]
fn adaptive_budget_follows_plan_depth_and_ceiling() {
    let nodes = chain(6);
    assert_eq!(CascadeConfig::new().passes_for(&nodes), 6);
    assert_eq!(CascadeConfig::new().with_max_passes(2).passes_for(&nodes), 2);
    assert_eq!(CascadeConfig::new().passes_for(&[]), 1);
}

#[test]
fn pass_limit_defaults_to_adaptive() {
    assert_eq!(PassLimit::default(), PassLimit::Adaptive);
    assert_eq!(CascadeConfig::new().pass_limit, PassLimit::Adaptive);
}

#[test]
fn recompute_is_idempotent() {
    let nodes = vec![
        CourseNode::new("1", "A", 1).with_state(CourseState::Blocked),
        CourseNode::new("2", "B", 2).requiring_regularized(["1"]),
        CourseNode::new("3", "C", 2)
            .with_state(CourseState::Blocked)
            .requiring_approved(["1"]),
    ];
    let engine = CascadeEngine::new();
    let once = engine.recompute(&nodes);
    let twice = engine.recompute(&once);
    assert_eq!(once, twice);
}

#[test]
fn recompute_does_not_mutate_input() {
    let nodes = vec![CourseNode::new("1", "A", 1).with_state(CourseState::Blocked)];
    let snapshot = nodes.clone();
    let _ = CascadeEngine::new().recompute(&nodes);
    assert_eq!(nodes, snapshot);
}

#[test]
fn cyclic_plan_terminates() {
    let nodes = vec![
        CourseNode::new("a", "A", 2).requiring_approved(["b"]),
        CourseNode::new("b", "B", 2).requiring_approved(["a"]),
    ];
    let out = CascadeEngine::new().recompute(&nodes);
    assert_eq!(state_of(&out, "a"), CourseState::Blocked);
    assert_eq!(state_of(&out, "b"), CourseState::Blocked);
}

#[test]
fn manual_transition_report_includes_the_target() {
    let nodes = vec![
        CourseNode::new("1", "A", 1),
        CourseNode::new("2", "B", 2)
            .with_state(CourseState::Blocked)
            .requiring_approved(["1"]),
        CourseNode::new("3", "C", 2).requiring_approved(["missing"]),
    ];
    let engine = CascadeEngine::new();
    let (out, report) =
        engine.apply_manual_transition_with_report(&nodes, &CourseId::from("1"), CourseState::Approved);
    assert_eq!(state_of(&out, "2"), CourseState::Available);
    // 3 was available in the input and is blocked now.
    assert_eq!(
        report.changed,
        vec![CourseId::from("1"), CourseId::from("2"), CourseId::from("3")]
    );

    // Setting a course to the state it already has reports nothing for it.
    let (_, report) =
        engine.apply_manual_transition_with_report(&out, &CourseId::from("1"), CourseState::Approved);
    assert!(report.changed.is_empty());
}

#[test]
fn unknown_transition_target_only_recomputes() {
    let nodes = vec![CourseNode::new("1", "A", 1).with_state(CourseState::Blocked)];
    let out = CascadeEngine::new().apply_manual_transition(
        &nodes,
        &CourseId::from("nope"),
        CourseState::Approved,
    );
    assert_eq!(state_of(&out, "1"), CourseState::Available);
}

#[test]
fn empty_plan_is_fine() {
    let (out, report) = CascadeEngine::new().recompute_with_report(&[]);
    assert!(out.is_empty());
    assert!(report.converged);
    assert_eq!(report.passes, 0);
}

#[test]
fn cycle_state_follows_tap_order() {
    assert_eq!(cycle_state(CourseState::Available), CourseState::Regularized);
    assert_eq!(cycle_state(CourseState::Blocked), CourseState::Blocked);
}
