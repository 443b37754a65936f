// SPDX-License-Identifier: Apache-2.0

//! Epoch counters that decide whether an async result may still be applied.

use std::sync::atomic::{AtomicU64, Ordering};

/// Captured before a backend call; compared against the gate before applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GateToken(u64);

impl GateToken {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct InvalidationGate {
    epoch: AtomicU64,
}

impl InvalidationGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token strictly greater than every earlier one of this gate.
    pub fn issue(&self) -> GateToken {
        GateToken(self.epoch.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, token: GateToken) -> bool {
        self.epoch.load(Ordering::SeqCst) == token.0
    }

    #[must_use]
    pub fn current(&self) -> GateToken {
        GateToken(self.epoch.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OpClass {
    Filter,
    Slice,
    Sort,
    Category,
    Schema,
    CrossQuery,
    Drawer,
}

impl OpClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Slice => "slice",
            Self::Sort => "sort",
            Self::Category => "category",
            Self::Schema => "schema",
            Self::CrossQuery => "cross_query",
            Self::Drawer => "row_drawer",
        }
    }
}

/// One gate per operation class; ordering is enforced per class only.
#[derive(Debug, Default)]
pub struct Gates {
    filter: InvalidationGate,
    slice: InvalidationGate,
    sort: InvalidationGate,
    category: InvalidationGate,
    schema: InvalidationGate,
    cross_query: InvalidationGate,
    drawer: InvalidationGate,
}

impl Gates {
    #[must_use]
    pub fn gate(&self, class: OpClass) -> &InvalidationGate {
        match class {
            OpClass::Filter => &self.filter,
            OpClass::Slice => &self.slice,
            OpClass::Sort => &self.sort,
            OpClass::Category => &self.category,
            OpClass::Schema => &self.schema,
            OpClass::CrossQuery => &self.cross_query,
            OpClass::Drawer => &self.drawer,
        }
    }

    pub fn issue(&self, class: OpClass) -> GateToken {
        self.gate(class).issue()
    }

    #[must_use]
    pub fn is_current(&self, class: OpClass, token: GateToken) -> bool {
        self.gate(class).is_current(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_issue_invalidates_earlier_token() {
        let gate = InvalidationGate::new();
        let a = gate.issue();
        assert!(gate.is_current(a));
        let b = gate.issue();
        assert!(b > a);
        assert!(!gate.is_current(a));
        assert!(gate.is_current(b));
    }

    #[test]
    fn classes_do_not_interfere() {
        let gates = Gates::default();
        let filter = gates.issue(OpClass::Filter);
        let _slice = gates.issue(OpClass::Slice);
        let _slice = gates.issue(OpClass::Slice);
        assert!(gates.is_current(OpClass::Filter, filter));
    }
}
