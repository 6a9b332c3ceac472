use std::fmt::{self, Debug};

/// One of the four CRUD operations a column can take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Retrieve,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Retrieve,
        Operation::Update,
        Operation::Delete,
    ];

    const fn bit(self) -> u8 {
        match self {
            Operation::Create => 1 << 0,
            Operation::Retrieve => 1 << 1,
            Operation::Update => 1 << 2,
            Operation::Delete => 1 << 3,
        }
    }
}

/// A set of [`Operation`]s, used to mark a column as skipped for any subset
/// of the CRUD operations at once.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct OperationSet(u8);

impl OperationSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn with(self, op: Operation) -> Self {
        Self(self.0 | op.bit())
    }

    pub const fn contains(&self, op: Operation) -> bool {
        self.0 & op.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Operation> for OperationSet {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        iter.into_iter()
            .fold(OperationSet::empty(), OperationSet::with)
    }
}

impl Debug for OperationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Operation::ALL.iter().filter(|op| self.contains(**op)))
            .finish()
    }
}
