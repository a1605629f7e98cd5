use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::{
    model::{Member, NewMember, Team},
    store::Store,
};

pub const DEFAULT_TEAM_NAME: &str = "My Team";

/// Holds at most one team. Operations on ids that are not present are
/// ignored.
#[derive(Debug, Default)]
pub struct TeamStore {
    state: Store<Option<Team>>,
}

impl TeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(&self) -> Option<Team> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Team>> {
        self.state.subscribe()
    }

    /// Creates the team unless one already exists.
    pub fn create_team(&self, name: &str) -> bool {
        let created = self.state.update(|team| {
            if team.is_some() {
                return false;
            }
            *team = Some(Team::new(name));
            true
        });
        if created {
            debug!(name, "Team created");
        }
        created
    }

    /// Idempotent.
    pub fn ensure_default(&self) {
        self.create_team(DEFAULT_TEAM_NAME);
    }

    /// Returns the generated member id, or `None` when there is no team.
    pub fn add_member(&self, input: NewMember) -> Option<Uuid> {
        let id = Uuid::new_v4();
        let added = self.state.update(|team| {
            let Some(team) = team else {
                return false;
            };
            team.members.push(Member {
                id,
                name: input.name,
                role: input.role,
                resume: input.resume,
            });
            true
        });
        added.then(|| {
            debug!(member_id = %id, "Team member added");
            id
        })
    }

    pub fn remove_member(&self, member_id: Uuid) -> bool {
        self.state.update(|team| {
            let Some(team) = team else {
                return false;
            };
            let before = team.members.len();
            team.members.retain(|m| m.id != member_id);
            if team.members.len() == before {
                return false;
            }
            if team.lead_id == Some(member_id) {
                team.lead_id = None;
            }
            true
        })
    }

    /// Makes `member_id` the sole lead. Unknown members are ignored.
    pub fn set_team_lead(&self, member_id: Uuid) -> bool {
        self.state.update(|team| match team {
            Some(team) if team.member(member_id).is_some() && !team.is_lead(member_id) => {
                team.lead_id = Some(member_id);
                true
            }
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, role: &str) -> NewMember {
        NewMember {
            name: name.to_string(),
            role: role.to_string(),
            resume: None,
        }
    }

    #[test]
    fn my_team_scenario() {
        let store = TeamStore::new();
        assert!(store.team().is_none());

        assert!(store.create_team("My Team"));
        let team = store.team().unwrap();
        assert_eq!(team.name, "My Team");
        assert!(team.members.is_empty());

        let ann = store.add_member(member("Ann", "QA Engineer")).unwrap();
        let team = store.team().unwrap();
        assert_eq!(team.members.len(), 1);
        assert_eq!(team.members[0].name, "Ann");
        assert_eq!(team.members[0].id, ann);

        store.set_team_lead(ann);
        assert_eq!(store.team().unwrap().lead_id, Some(ann));
    }

    #[test]
    fn create_team_is_a_no_op_when_one_exists() {
        let store = TeamStore::new();
        store.ensure_default();
        let first = store.team().unwrap();

        assert!(!store.create_team("Other"));
        store.ensure_default();
        assert_eq!(store.team().unwrap(), first);
    }

    #[test]
    fn add_member_without_team_does_nothing() {
        let store = TeamStore::new();
        assert_eq!(store.add_member(member("Ann", "QA Engineer")), None);
        assert!(store.team().is_none());
    }

    #[test]
    fn only_one_lead_at_a_time() {
        let store = TeamStore::new();
        store.ensure_default();
        let x = store.add_member(member("X", "Backend Developer")).unwrap();
        let y = store.add_member(member("Y", "Frontend Developer")).unwrap();

        store.set_team_lead(x);
        store.set_team_lead(y);

        let team = store.team().unwrap();
        assert_eq!(team.lead_id, Some(y));
        assert!(!team.is_lead(x));
    }

    #[test]
    fn removing_the_lead_clears_lead_id() {
        let store = TeamStore::new();
        store.ensure_default();
        let ann = store.add_member(member("Ann", "QA Engineer")).unwrap();
        let bob = store.add_member(member("Bob", "UI/UX Designer")).unwrap();
        store.set_team_lead(ann);

        store.remove_member(bob);
        assert_eq!(store.team().unwrap().lead_id, Some(ann));

        store.remove_member(ann);
        let team = store.team().unwrap();
        assert_eq!(team.lead_id, None);
        assert!(team.members.is_empty());
    }

    #[test]
    fn unknown_ids_are_ignored_without_notifying() {
        let store = TeamStore::new();
        store.ensure_default();
        let ann = store.add_member(member("Ann", "QA Engineer")).unwrap();
        store.set_team_lead(ann);
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        assert!(!store.remove_member(Uuid::new_v4()));
        assert!(!store.set_team_lead(Uuid::new_v4()));

        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.team().unwrap().lead_id, Some(ann));
    }
}
