//! Session data structure

use mediboard_api::{Menu, User};
use serde::{Deserialize, Serialize};

/// The authenticated principal's token, profile and sidebar menu, held for
/// the process lifetime. Exactly one per client process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub menu: Menu,
}

impl Session {
    pub fn new(token: String, user: User, menu: Menu) -> Self {
        Self { token, user, menu }
    }

    /// A user counts as logged in iff the token is non-empty.
    pub fn is_logged(&self) -> bool {
        !self.token.is_empty()
    }
}
