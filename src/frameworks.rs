//! Framework identities and the variant-tracking primitive.
//!
//! A run processes frameworks in a fixed declared order; "first pass" and
//! "last pass" are defined relative to that order, not per type. Every
//! variant fact in the document records across which frameworks it holds
//! using a [`Membership`] set. A set equal to the complete run set is the
//! canonical "applies everywhere" state and is elided from the persisted
//! attribute; absence decodes back to [`Membership::All`], making the
//! elision round-trip a no-op.
//!
//! The `;`-delimited string form exists only at the serialization boundary;
//! inside the engine membership is a proper set type.

use indexmap::IndexSet;

/// Delimiter used for the persisted framework-list attribute.
pub const FRAMEWORK_DELIMITER: char = ';';

/// The complete, ordered set of framework identifiers known to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkSet {
    order: Vec<String>,
}

impl FrameworkSet {
    pub fn new<I, S>(frameworks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order: Vec<String> = Vec::new();
        for fx in frameworks {
            let fx = fx.into();
            if !order.contains(&fx) {
                order.push(fx);
            }
        }
        Self { order }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, framework: &str) -> bool {
        self.order.iter().any(|f| f == framework)
    }

    pub fn index_of(&self, framework: &str) -> Option<usize> {
        self.order.iter().position(|f| f == framework)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// The pass for the framework at `index` in the declared order.
    pub fn pass(&self, index: usize) -> Option<PassInfo<'_>> {
        self.order.get(index).map(|fx| PassInfo {
            framework: fx,
            index,
            set: self,
        })
    }

    /// All passes of the run, in order.
    pub fn passes(&self) -> impl Iterator<Item = PassInfo<'_>> {
        (0..self.order.len()).map(|i| self.pass(i).unwrap())
    }
}

/// One framework pass: the framework being processed plus its position in
/// the run order.
#[derive(Debug, Clone, Copy)]
pub struct PassInfo<'a> {
    pub framework: &'a str,
    pub index: usize,
    set: &'a FrameworkSet,
}

impl<'a> PassInfo<'a> {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.set.len()
    }

    pub fn known(&self) -> &'a FrameworkSet {
        self.set
    }
}

/// Across which frameworks a fact holds.
///
/// `All` is the canonical universal state produced by elision; a `Subset`
/// lists explicit members in insertion order. Removing a framework from
/// `All` first materializes the full run set, since "all" is only
/// meaningful relative to the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    All,
    Subset(IndexSet<String>),
}

impl Membership {
    /// Membership holding only the given framework.
    pub fn only(framework: &str) -> Self {
        let mut set = IndexSet::new();
        set.insert(framework.to_string());
        Membership::Subset(set)
    }

    pub fn contains(&self, framework: &str) -> bool {
        match self {
            Membership::All => true,
            Membership::Subset(set) => set.contains(framework),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Membership::All => false,
            Membership::Subset(set) => set.is_empty(),
        }
    }

    pub fn insert(&mut self, framework: &str) {
        match self {
            Membership::All => {}
            Membership::Subset(set) => {
                set.insert(framework.to_string());
            }
        }
    }

    pub fn remove(&mut self, framework: &str, known: &FrameworkSet) {
        if let Membership::All = self {
            let set: IndexSet<String> = known.iter().map(str::to_string).collect();
            *self = Membership::Subset(set);
        }
        if let Membership::Subset(set) = self {
            set.shift_remove(framework);
        }
    }

    /// Collapse a subset covering the complete run set into `All`.
    pub fn canonicalize(&mut self, known: &FrameworkSet) {
        if let Membership::Subset(set) = self {
            if !known.is_empty() && known.iter().all(|fx| set.contains(fx)) {
                *self = Membership::All;
            }
        }
    }

    /// Render for the persisted attribute: `None` means the attribute is
    /// omitted (universal). Subset members are ordered by the run's declared
    /// order; identifiers unknown to the run keep insertion order at the end.
    pub fn encode(&self, known: &FrameworkSet) -> Option<String> {
        match self {
            Membership::All => None,
            Membership::Subset(set) => {
                let mut ids: Vec<&str> = set.iter().map(String::as_str).collect();
                ids.sort_by_key(|fx| known.index_of(fx).unwrap_or(usize::MAX));
                let mut out = String::new();
                for (i, fx) in ids.iter().enumerate() {
                    if i > 0 {
                        out.push(FRAMEWORK_DELIMITER);
                    }
                    out.push_str(fx);
                }
                Some(out)
            }
        }
    }

    /// Parse the persisted attribute; absence means "all frameworks".
    pub fn decode(attr: Option<&str>) -> Self {
        match attr {
            None => Membership::All,
            Some(text) => {
                let set: IndexSet<String> = text
                    .split(FRAMEWORK_DELIMITER)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                Membership::Subset(set)
            }
        }
    }
}
