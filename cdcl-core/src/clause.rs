//! The clause store.
//!
//! Clauses are addressed by a stable [`ClauseId`] handle so that antecedent references on the
//! trail and parent links used by the proof recorder survive further additions. Unlike the
//! unsafe, pointer-transmuting bump allocator a two-watched-literal propagator needs for speed,
//! this store is a plain `Vec<Clause>` — the naive full-rescan propagator this design uses has no
//! use for that layout. There is no clause deletion policy: clauses are never destroyed once
//! added.

use cdcl_formula::Lit;

/// A stable handle to a clause in a [`ClauseDb`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ClauseId(u32);

impl ClauseId {
    pub(crate) fn from_index(index: usize) -> ClauseId {
        ClauseId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A clause together with the metadata the solver needs to track it.
pub struct Clause {
    literals: Vec<Lit>,
    learned: bool,
}

impl Clause {
    /// The clause's literals, in storage order.
    pub fn literals(&self) -> &[Lit] {
        &self.literals
    }

    /// Whether this clause was learned by conflict analysis, as opposed to an original clause of
    /// the input formula.
    pub fn is_learned(&self) -> bool {
        self.learned
    }

    /// Number of literals.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether the clause has no literals (the empty clause, `⊥`).
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// The clause store: owns every original and learned clause.
#[derive(Default)]
pub struct ClauseDb {
    clauses: Vec<Clause>,
}

impl ClauseDb {
    /// Create an empty clause store.
    pub fn new() -> ClauseDb {
        ClauseDb::default()
    }

    /// Append an original clause from the input formula.
    pub fn add_original(&mut self, literals: impl Into<Vec<Lit>>) -> ClauseId {
        self.push(Clause {
            literals: literals.into(),
            learned: false,
        })
    }

    /// Append a clause produced by conflict analysis.
    pub fn add_learned(&mut self, literals: impl Into<Vec<Lit>>) -> ClauseId {
        self.push(Clause {
            literals: literals.into(),
            learned: true,
        })
    }

    fn push(&mut self, clause: Clause) -> ClauseId {
        let id = ClauseId::from_index(self.clauses.len());
        self.clauses.push(clause);
        id
    }

    /// Read-only access to a clause.
    pub fn get(&self, id: ClauseId) -> &Clause {
        &self.clauses[id.index()]
    }

    /// Number of clauses in the store.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Enumerate all clauses and their handles, in insertion order (originals first, then
    /// learned, exactly as added).
    pub fn iter(&self) -> impl Iterator<Item = (ClauseId, &Clause)> {
        self.clauses
            .iter()
            .enumerate()
            .map(|(index, clause)| (ClauseId::from_index(index), clause))
    }
}
