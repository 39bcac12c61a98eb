//! Longest prerequisite chain of a plan.

use std::collections::{HashMap, HashSet};

use crate::course::{CourseId, CourseNode};

/// Length, in edges, of the longest prerequisite chain in `nodes`.
///
/// Prerequisite ids that match no node do not count as a hop. A cycle is cut
/// at the edge that closes it, so the result is finite for any input.
pub fn prerequisite_depth(nodes: &[CourseNode]) -> usize {
    let mut index: HashMap<&CourseId, &CourseNode> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        index.entry(&node.id).or_insert(node);
    }

    let mut memo: HashMap<&CourseId, usize> = HashMap::with_capacity(nodes.len());
    let mut visiting: HashSet<&CourseId> = HashSet::new();

    nodes
        .iter()
        .map(|node| depth_of(&node.id, &index, &mut memo, &mut visiting))
        .max()
        .unwrap_or(0)
}

fn depth_of<'a>(
    id: &'a CourseId,
    index: &HashMap<&'a CourseId, &'a CourseNode>,
    memo: &mut HashMap<&'a CourseId, usize>,
    visiting: &mut HashSet<&'a CourseId>,
) -> usize {
    if let Some(&depth) = memo.get(id) {
        return depth;
    }
    let node: &'a CourseNode = match index.get(id) {
        Some(node) => *node,
        None => return 0,
    };
    if !visiting.insert(id) {
        // Back edge.
        return 0;
    }

    let mut depth = 0;
    for prereq in node
        .requires_regularized
        .iter()
        .chain(node.requires_approved.iter())
    {
        if index.contains_key(prereq) && !visiting.contains(prereq) {
            depth = depth.max(1 + depth_of(prereq, index, memo, visiting));
        }
    }

    visiting.remove(id);
    memo.insert(id, depth);
    depth
}
