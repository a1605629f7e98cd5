use uuid::Uuid;

use crate::{
    model::{NewMember, ResumeFile, Team, User, UserRole},
    stores::TeamStore,
};

/// Positions offered by the add-member form.
pub const MEMBER_ROLE_OPTIONS: [&str; 5] = [
    "Frontend Developer",
    "Backend Developer",
    "UI/UX Designer",
    "Project Manager",
    "QA Engineer",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub member_id: Uuid,
    pub name: String,
    pub role: String,
    pub initial: Option<char>,
    pub is_lead: bool,
    pub resume_name: Option<String>,
    pub can_promote: bool,
    pub can_remove: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamView {
    pub team_name: Option<String>,
    pub rows: Vec<RosterRow>,
    pub can_add: bool,
}

impl TeamView {
    /// Controls are shown only to leads. This hides them in the UI; it is
    /// not an access check.
    pub fn derive(team: Option<&Team>, viewer: &User) -> Self {
        let manage = viewer.role == UserRole::Lead;
        let rows = team
            .map(|team| {
                team.members
                    .iter()
                    .map(|member| {
                        let is_lead = team.is_lead(member.id);
                        RosterRow {
                            member_id: member.id,
                            name: member.name.clone(),
                            role: member.role.clone(),
                            initial: member.name.chars().next().map(|c| {
                                c.to_uppercase().next().unwrap_or(c)
                            }),
                            is_lead,
                            resume_name: member.resume.as_ref().map(|r| r.name.clone()),
                            can_promote: manage && !is_lead,
                            can_remove: manage,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            team_name: team.map(|t| t.name.clone()),
            rows,
            can_add: manage,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Add-member form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddMemberForm {
    pub open: bool,
    pub name: String,
    pub role: String,
    pub resume: Option<ResumeFile>,
}

impl AddMemberForm {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Accepts one of [`MEMBER_ROLE_OPTIONS`], or `""` to clear.
    pub fn select_role(&mut self, role: &str) -> bool {
        if !role.is_empty() && !MEMBER_ROLE_OPTIONS.contains(&role) {
            return false;
        }
        self.role = role.to_string();
        true
    }

    pub fn attach_resume(&mut self, resume: ResumeFile) {
        self.resume = Some(resume);
    }

    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty() && !self.role.trim().is_empty()
    }

    /// Adds the member and resets the form. Incomplete forms are left as they are.
    pub fn submit(&mut self, store: &TeamStore) -> Option<Uuid> {
        if !self.can_submit() {
            return None;
        }
        let input = NewMember {
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            resume: self.resume.take(),
        };
        *self = Self::default();
        store.add_member(input)
    }
}

#[cfg(test)]
mod tests {
    use crate::stores::AuthStore;

    use super::*;

    fn store_with(names: &[&str]) -> (TeamStore, Vec<Uuid>) {
        let store = TeamStore::new();
        store.ensure_default();
        let ids = names
            .iter()
            .map(|name| {
                store
                    .add_member(NewMember {
                        name: name.to_string(),
                        role: "QA Engineer".to_string(),
                        resume: None,
                    })
                    .unwrap()
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn lead_sees_controls_except_promote_on_lead_row() {
        let (store, ids) = store_with(&["ann", "bob"]);
        store.set_team_lead(ids[0]);
        let auth = AuthStore::demo();

        let view = TeamView::derive(store.team().as_ref(), &auth.user());
        assert!(view.can_add);
        assert_eq!(view.team_name.as_deref(), Some("My Team"));

        let ann = &view.rows[0];
        assert_eq!(ann.initial, Some('A'));
        assert!(ann.is_lead);
        assert!(!ann.can_promote);
        assert!(ann.can_remove);

        let bob = &view.rows[1];
        assert!(!bob.is_lead);
        assert!(bob.can_promote);
    }

    #[test]
    fn members_see_no_controls() {
        let (store, _) = store_with(&["ann"]);
        let auth = AuthStore::demo();
        auth.update_user_role(UserRole::Member);

        let view = TeamView::derive(store.team().as_ref(), &auth.user());
        assert!(!view.can_add);
        assert!(view.rows.iter().all(|r| !r.can_promote && !r.can_remove));
    }

    #[test]
    fn no_team_renders_empty() {
        let view = TeamView::derive(None, &AuthStore::demo().user());
        assert!(view.is_empty());
        assert_eq!(view.team_name, None);
    }

    #[test]
    fn form_submits_only_when_complete_then_resets() {
        let (store, _) = store_with(&[]);
        let mut form = AddMemberForm::default();
        form.open();

        form.set_name("   ");
        assert!(form.select_role("QA Engineer"));
        assert_eq!(form.submit(&store), None);
        assert!(form.open);

        form.set_name(" Ann ");
        assert!(!form.select_role("Astronaut"));
        form.attach_resume(ResumeFile::named("ann.pdf"));
        let id = form.submit(&store).unwrap();

        assert_eq!(form, AddMemberForm::default());
        let team = store.team().unwrap();
        let ann = team.member(id).unwrap();
        assert_eq!(ann.name, "Ann");
        assert_eq!(ann.role, "QA Engineer");
        assert_eq!(ann.resume.as_ref().map(|r| r.name.as_str()), Some("ann.pdf"));

        let view = TeamView::derive(Some(&team), &AuthStore::demo().user());
        assert_eq!(view.rows[0].resume_name.as_deref(), Some("ann.pdf"));
    }

    #[test]
    fn closing_the_form_keeps_the_draft() {
        let mut form = AddMemberForm::default();
        form.open();
        form.set_name("Bo");
        form.close();

        assert!(!form.open);
        assert_eq!(form.name, "Bo");

        form.open();
        assert!(form.open);
        assert_eq!(form.name, "Bo");
    }
}
