//! Merge planning: decides, per proposal, between update and insert.
//!
//! Pure. The engine executes the plan against the store.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::domain::foundation::{DocumentId, Timestamp, UserId};
use crate::domain::record::NamespaceKind;

use super::{Document, ExtractionProposal, Namespace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteAction {
    Update,
    Insert,
}

/// One document write the engine will perform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedWrite {
    pub namespace: Namespace,
    pub document: Document,
    pub action: WriteAction,
}

/// Ids already stored, per namespace kind, for one user.
pub type ExistingIds = BTreeMap<NamespaceKind, BTreeSet<DocumentId>>;

/// Writes for one turn, in proposal arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergePlan {
    pub writes: Vec<PlannedWrite>,
}

impl MergePlan {
    /// Plans a write for every proposal.
    ///
    /// A hint is honoured only when it names a document stored in the
    /// proposal's own namespace; anything else becomes an insert under a
    /// freshly generated id that collides with nothing stored or planned.
    pub fn build(
        proposals: Vec<ExtractionProposal>,
        user_id: &UserId,
        existing: &ExistingIds,
        now: Timestamp,
    ) -> Self {
        let empty = BTreeSet::new();
        let mut generated: HashSet<DocumentId> = HashSet::new();

        let writes = proposals
            .into_iter()
            .map(|proposal| {
                let namespace_kind = proposal.kind.namespace_kind();
                let stored = existing.get(&namespace_kind).unwrap_or(&empty);

                let (id, action) = match proposal.existing_id {
                    Some(hint) if stored.contains(&hint) => (hint, WriteAction::Update),
                    _ => {
                        let id = fresh_id(|candidate| {
                            stored.contains(candidate) || generated.contains(candidate)
                        });
                        generated.insert(id.clone());
                        (id, WriteAction::Insert)
                    }
                };

                PlannedWrite {
                    namespace: Namespace::new(namespace_kind, user_id.clone()),
                    document: Document::new(id, proposal.kind, proposal.payload)
                        .with_updated_at(now),
                    action,
                }
            })
            .collect();

        Self { writes }
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Writes grouped by target document.
    ///
    /// Groups are independent of each other; within a group the writes
    /// keep arrival order and must run one after another.
    pub fn into_groups(self) -> Vec<Vec<PlannedWrite>> {
        let mut order: Vec<(Namespace, DocumentId)> = Vec::new();
        let mut groups: BTreeMap<(Namespace, DocumentId), Vec<PlannedWrite>> = BTreeMap::new();

        for write in self.writes {
            let key = (write.namespace.clone(), write.document.id.clone());
            if !groups.contains_key(&key) {
                order.push(key.clone());
            }
            groups.entry(key).or_default().push(write);
        }

        order
            .into_iter()
            .filter_map(|key| groups.remove(&key))
            .collect()
    }
}

fn fresh_id(taken: impl Fn(&DocumentId) -> bool) -> DocumentId {
    loop {
        let candidate = DocumentId::generate();
        if !taken(&candidate) {
            return candidate;
        }
    }
}
