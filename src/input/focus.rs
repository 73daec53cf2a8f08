//! Process-wide keyboard focus register
//!
//! Exactly one interactive element (a stave grid, an articulation row, a
//! text block or a popup) captures the keyboard at a time. Acquiring focus
//! hands out a lease and displaces the previous holder; a lease that has
//! been displaced can no longer release anything.

use serde::{Deserialize, Serialize};

use crate::workspace::ComponentId;

/// Something that can hold keyboard focus
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FocusOwner {
    Grid(ComponentId),
    Articulation(ComponentId),
    TextBlock(ComponentId),
    /// Tuning-edit popup opened on a stave
    Popup(ComponentId),
}

impl FocusOwner {
    pub fn component(&self) -> ComponentId {
        match *self {
            FocusOwner::Grid(id)
            | FocusOwner::Articulation(id)
            | FocusOwner::TextBlock(id)
            | FocusOwner::Popup(id) => id,
        }
    }
}

/// Proof of a focus acquisition, required to release it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusLease {
    owner: FocusOwner,
    generation: u64,
}

impl FocusLease {
    pub fn owner(&self) -> FocusOwner {
        self.owner
    }
}

#[derive(Debug, Default)]
pub struct FocusRegister {
    current: Option<FocusLease>,
    generation: u64,
}

impl FocusRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give focus to `owner`, returning its lease and the displaced holder
    ///
    /// Re-acquiring for the current holder keeps it in place and returns no
    /// displaced owner.
    pub fn acquire(&mut self, owner: FocusOwner) -> (FocusLease, Option<FocusOwner>) {
        self.generation += 1;
        let lease = FocusLease {
            owner,
            generation: self.generation,
        };
        let displaced = self
            .current
            .replace(lease)
            .map(|previous| previous.owner)
            .filter(|previous| *previous != owner);

        if let Some(previous) = displaced {
            log::debug!("focus moved from {:?} to {:?}", previous, owner);
        }
        (lease, displaced)
    }

    /// Release focus if `lease` is still the current one
    pub fn release(&mut self, lease: FocusLease) -> bool {
        if self.current == Some(lease) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Release focus held by any owner belonging to `id`
    pub fn release_component(&mut self, id: ComponentId) -> Option<FocusOwner> {
        match self.current {
            Some(lease) if lease.owner.component() == id => {
                self.current = None;
                Some(lease.owner)
            }
            _ => None,
        }
    }

    /// Drop focus entirely (pointer-down outside every focusable element)
    pub fn release_all(&mut self) -> Option<FocusOwner> {
        self.current.take().map(|lease| lease.owner)
    }

    pub fn holder(&self) -> Option<FocusOwner> {
        self.current.map(|lease| lease.owner)
    }

    pub fn is_held_by(&self, owner: FocusOwner) -> bool {
        self.holder() == Some(owner)
    }
}
