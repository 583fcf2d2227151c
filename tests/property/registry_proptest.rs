//! Property-based tests for the presence registry
//!
//! Random admit/remove sequences checked against a plain map model where
//! the newest admit wins and only the owning connection can remove.

use proptest::prelude::*;
use std::collections::HashMap;
use xfchat::backend::presence::{ConnectionHandle, ConnectionId, PresenceRegistry};
use xfchat::shared::UserId;

#[derive(Debug, Clone)]
enum Op {
    Admit(u8),
    /// Remove using the n-th handle ever created
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4).prop_map(Op::Admit),
        (0usize..64).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn test_registry_matches_model(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let registry = PresenceRegistry::new();
        let mut model: HashMap<UserId, ConnectionId> = HashMap::new();
        let mut created: Vec<(UserId, ConnectionId)> = Vec::new();

        for op in ops {
            match op {
                Op::Admit(n) => {
                    let user = UserId::from(format!("u{}", n));
                    let (handle, _rx) = ConnectionHandle::channel(1);
                    let id = handle.id();
                    let displaced = registry.admit(user.clone(), handle);

                    prop_assert_eq!(displaced.map(|h| h.id()), model.get(&user).copied());
                    model.insert(user.clone(), id);
                    created.push((user, id));
                }
                Op::Remove(n) => {
                    if created.is_empty() {
                        continue;
                    }
                    let (user, id) = created[n % created.len()].clone();
                    let owned = model.get(&user) == Some(&id);

                    prop_assert_eq!(registry.remove(&user, id), owned);
                    if owned {
                        model.remove(&user);
                    }
                }
            }

            prop_assert_eq!(registry.len(), model.len());
            for (user, id) in &model {
                prop_assert_eq!(registry.lookup(user).map(|h| h.id()), Some(*id));
            }
        }
    }
}
