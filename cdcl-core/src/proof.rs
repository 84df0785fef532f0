//! The proof recorder.
//!
//! Active only on UNSAT outcomes. Every clause that conflict analysis resolves on is recorded as
//! a node; original clauses are leaves, and each resolution step produces a new node with exactly
//! two parents — the accumulating resolvent and the antecedent clause it was resolved against.
//! This binary-antecedent shape is what 1-UIP analysis naturally produces, one resolution step at
//! a time, in contrast to an n-ary reduction straight to a clause's base clauses.
//!
//! Because a node is only ever created after both of its parents exist, node ids are already a
//! topological order: the final write pass just has to restrict to the nodes reachable from the
//! empty clause and relabel them densely in that order, which is the post-order the external
//! proof format wants.

use std::collections::HashSet;
use std::io;

use cdcl_formula::Lit;

use crate::clause::ClauseId;

/// A node in the proof DAG.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

struct ProofNode {
    literals: Vec<Lit>,
    parents: Option<(NodeId, NodeId)>,
}

/// Records the resolution steps of conflict analysis so that, on UNSAT, a resolution refutation
/// can be written out.
#[derive(Default)]
pub struct Proof {
    nodes: Vec<ProofNode>,
    clause_nodes: Vec<Option<NodeId>>,
    terminal: Option<NodeId>,
}

impl Proof {
    /// Create an empty proof recorder.
    pub fn new() -> Proof {
        Proof::default()
    }

    fn push(&mut self, literals: Vec<Lit>, parents: Option<(NodeId, NodeId)>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ProofNode { literals, parents });
        id
    }

    /// The node for `clause`, creating a leaf node from `literals` the first time this clause is
    /// referenced.
    pub fn node_for_clause(&mut self, clause: ClauseId, literals: &[Lit]) -> NodeId {
        let index = clause.index();
        if self.clause_nodes.len() <= index {
            self.clause_nodes.resize(index + 1, None);
        }
        if let Some(node) = self.clause_nodes[index] {
            return node;
        }
        let node = self.push(literals.to_vec(), None);
        self.clause_nodes[index] = Some(node);
        node
    }

    /// Record a resolution step combining `left` and `right` into `result`.
    pub fn resolve(&mut self, left: NodeId, right: NodeId, result: &[Lit]) -> NodeId {
        self.push(result.to_vec(), Some((left, right)))
    }

    /// Bind a freshly learned clause's handle to the node produced while deriving it, so later
    /// analyses that use this clause as an antecedent find the existing node instead of treating
    /// it as a leaf.
    pub fn bind_clause(&mut self, clause: ClauseId, node: NodeId) {
        let index = clause.index();
        if self.clause_nodes.len() <= index {
            self.clause_nodes.resize(index + 1, None);
        }
        self.clause_nodes[index] = Some(node);
    }

    /// Mark `node` — necessarily the empty clause — as a refutation root.
    pub fn set_terminal(&mut self, node: NodeId) {
        debug_assert!(self.nodes[node.0 as usize].literals.is_empty());
        self.terminal = Some(node);
    }

    /// Whether a refutation root has been recorded.
    pub fn has_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Write the resolution refutation in the format described in the boundary contract: a
    /// `v N` header, `N` clause lines `i: l1 l2 ... lk`, then resolution triples `a b c`.
    pub fn write(&self, target: &mut impl io::Write) -> io::Result<()> {
        let terminal = self.terminal.expect("write called without a terminal node");

        // Collect every node reachable from the terminal via parent links.
        let mut seen = HashSet::new();
        let mut stack = vec![terminal];
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            if let Some((a, b)) = self.nodes[node.0 as usize].parents {
                stack.push(a);
                stack.push(b);
            }
        }

        // Node ids are assigned in creation order, and a node always postdates its parents, so
        // sorting the reachable set by id yields a valid topological (and therefore post-order)
        // linearization without an explicit traversal.
        let mut reachable: Vec<NodeId> = seen.into_iter().collect();
        reachable.sort_by_key(|node| node.0);

        let mut remapped = vec![0u32; self.nodes.len()];
        for (new_id, &node) in reachable.iter().enumerate() {
            remapped[node.0 as usize] = new_id as u32;
        }

        writeln!(target, "v {}", reachable.len())?;
        for (new_id, &node) in reachable.iter().enumerate() {
            write!(target, "{}:", new_id)?;
            for lit in &self.nodes[node.0 as usize].literals {
                write!(target, " {}", lit.to_dimacs())?;
            }
            writeln!(target)?;
        }

        for &node in &reachable {
            if let Some((a, b)) = self.nodes[node.0 as usize].parents {
                writeln!(
                    target,
                    "{} {} {}",
                    remapped[a.0 as usize], remapped[b.0 as usize], remapped[node.0 as usize]
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cdcl_formula::lits;

    #[test]
    fn minimal_contradiction() {
        let mut proof = Proof::new();

        let a = proof.node_for_clause(ClauseId::from_index(0), &lits![1]);
        let b = proof.node_for_clause(ClauseId::from_index(1), &lits![-1]);
        let empty = proof.resolve(a, b, &[]);
        proof.set_terminal(empty);

        let mut out = vec![];
        proof.write(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "v 3\n0: 1\n1: -1\n2:\n0 1 2\n"
        );
    }

    #[test]
    fn unreachable_nodes_are_excluded() {
        let mut proof = Proof::new();

        let a = proof.node_for_clause(ClauseId::from_index(0), &lits![1]);
        let b = proof.node_for_clause(ClauseId::from_index(1), &lits![-1]);
        // A clause never used in the final contradiction.
        let _unused = proof.node_for_clause(ClauseId::from_index(2), &lits![2, 3]);
        let empty = proof.resolve(a, b, &[]);
        proof.set_terminal(empty);

        let mut out = vec![];
        proof.write(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "v 3\n0: 1\n1: -1\n2:\n0 1 2\n"
        );
    }
}
