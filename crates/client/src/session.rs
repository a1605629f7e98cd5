use tracing::info;

use crate::stores::{AuthStore, TaskStore, TeamStore};

/// Owns the client stores for the lifetime of one session.
///
/// Starting a session seeds the defaults the views expect (the demo user
/// and a team named "My Team"); ending it drops all state.
#[derive(Debug)]
pub struct ClientSession {
    pub auth: AuthStore,
    pub team: TeamStore,
    pub tasks: TaskStore,
}

impl ClientSession {
    pub fn start() -> Self {
        let session = Self {
            auth: AuthStore::demo(),
            team: TeamStore::new(),
            tasks: TaskStore::new(),
        };
        session.team.ensure_default();
        info!(user_id = %session.auth.user().id, "Client session started");
        session
    }

    pub fn end(self) {
        let tasks = self.tasks.tasks().len();
        info!(tasks, "Client session ended");
    }
}
