//! Dependency ordering for fragments.

use std::collections::HashMap;

use crate::error::{ScriptError, ScriptResult};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Order `nodes` so that every node comes after the nodes it depends on.
///
/// Each node is `(name, dependencies)`. Dependencies naming something outside
/// `nodes` are ignored here; callers decide whether those are satisfied.
/// Ties keep input order. Returns indices into `nodes`.
pub(crate) fn topo_order(nodes: &[(&str, &[String])]) -> ScriptResult<Vec<usize>> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (*name, i))
        .collect();

    let mut marks = vec![Mark::Unvisited; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());
    let mut path = Vec::new();

    for start in 0..nodes.len() {
        visit(start, nodes, &index, &mut marks, &mut path, &mut order)?;
    }

    Ok(order)
}

fn visit(
    node: usize,
    nodes: &[(&str, &[String])],
    index: &HashMap<&str, usize>,
    marks: &mut [Mark],
    path: &mut Vec<usize>,
    order: &mut Vec<usize>,
) -> ScriptResult<()> {
    match marks[node] {
        Mark::Done => return Ok(()),
        Mark::Visiting => {
            // Report the loop starting from the first time we entered it.
            let from = path.iter().position(|&n| n == node).unwrap_or(0);
            let mut cycle: Vec<String> = path[from..]
                .iter()
                .map(|&n| nodes[n].0.to_string())
                .collect();
            cycle.push(nodes[node].0.to_string());
            return Err(ScriptError::DependencyCycle { cycle });
        }
        Mark::Unvisited => {}
    }

    marks[node] = Mark::Visiting;
    path.push(node);

    for dep in nodes[node].1 {
        if let Some(&dep_index) = index.get(dep.as_str()) {
            visit(dep_index, nodes, index, marks, path, order)?;
        }
    }

    path.pop();
    marks[node] = Mark::Done;
    order.push(node);
    Ok(())
}
