use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::{
    model::{User, UserRole},
    store::Store,
};

pub const DEMO_USER_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: User,
    pub is_authenticated: bool,
}

/// Current user. There is no login flow: the session always runs as the
/// demo user, who starts out as a lead.
#[derive(Debug)]
pub struct AuthStore {
    state: Store<AuthState>,
}

impl AuthStore {
    pub fn demo() -> Self {
        Self::for_user(User {
            id: DEMO_USER_ID,
            username: "Demo User".to_string(),
            email: "demo@example.com".to_string(),
            role: UserRole::Lead,
        })
    }

    pub fn for_user(user: User) -> Self {
        Self {
            state: Store::new(AuthState {
                user,
                is_authenticated: true,
            }),
        }
    }

    pub fn user(&self) -> User {
        self.state.read(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read(|s| s.is_authenticated)
    }

    pub fn is_team_lead(&self) -> bool {
        self.state.read(|s| s.user.role == UserRole::Lead)
    }

    /// Replaces only the role of the current user.
    pub fn update_user_role(&self, role: UserRole) {
        let changed = self.state.update(|s| {
            if s.user.role == role {
                return false;
            }
            s.user.role = role;
            true
        });
        if changed {
            debug!(%role, "Client role changed");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
