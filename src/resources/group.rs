//! Named actor groups.
//!
//! Game code registers actors of one kind under a group name (the asteroid field
//! lives in `"asteroids"`) so broad-phase checks can walk a short list instead of
//! every live actor. The world drops a deleted actor from every group it is in.

use rustc_hash::FxHashMap;

use crate::actors::ActorId;

#[derive(Debug, Clone, Default)]
pub struct ActorGroups {
    groups: FxHashMap<String, Vec<ActorId>>,
}

impl ActorGroups {
    /// Add `actor` to `group`. Adding twice is a no-op.
    pub fn add(&mut self, group: impl Into<String>, actor: ActorId) {
        let members = self.groups.entry(group.into()).or_default();
        if !members.contains(&actor) {
            members.push(actor);
        }
    }

    /// Remove `actor` from `group`. Returns whether it was a member.
    pub fn remove(&mut self, group: &str, actor: ActorId) -> bool {
        let Some(members) = self.groups.get_mut(group) else {
            return false;
        };
        let before = members.len();
        members.retain(|a| *a != actor);
        before != members.len()
    }

    /// Remove `actor` from every group.
    pub fn remove_everywhere(&mut self, actor: ActorId) {
        for members in self.groups.values_mut() {
            members.retain(|a| *a != actor);
        }
    }

    /// Members of `group` in insertion order; empty if the group is unknown.
    pub fn members(&self, group: &str) -> &[ActorId] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, group: &str, actor: ActorId) -> bool {
        self.members(group).contains(&actor)
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<ActorId> {
        let mut map: SlotMap<ActorId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_add_and_members() {
        let ids = ids(2);
        let mut groups = ActorGroups::default();
        groups.add("asteroids", ids[0]);
        groups.add("asteroids", ids[1]);
        groups.add("asteroids", ids[0]);
        assert_eq!(groups.members("asteroids"), &[ids[0], ids[1]]);
    }

    #[test]
    fn test_unknown_group_is_empty() {
        let groups = ActorGroups::default();
        assert!(groups.members("nothing").is_empty());
    }

    #[test]
    fn test_remove_tolerates_absence() {
        let ids = ids(2);
        let mut groups = ActorGroups::default();
        assert!(!groups.remove("asteroids", ids[0]));
        groups.add("asteroids", ids[0]);
        assert!(groups.remove("asteroids", ids[0]));
        assert!(!groups.remove("asteroids", ids[0]));
    }

    #[test]
    fn test_remove_everywhere() {
        let ids = ids(2);
        let mut groups = ActorGroups::default();
        groups.add("asteroids", ids[0]);
        groups.add("targets", ids[0]);
        groups.add("targets", ids[1]);
        groups.remove_everywhere(ids[0]);
        assert!(!groups.contains("asteroids", ids[0]));
        assert!(!groups.contains("targets", ids[0]));
        assert!(groups.contains("targets", ids[1]));
    }
}
