//! Session Manager
//!
//! Mediates every authentication-related call to the remote API and owns
//! the single in-memory `Session` plus its durable copy in storage.

use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mediboard_api::{Api, Credentials, FileUploader, LoginResponse, Menu, NewUser, User, UserPage};
use mediboard_storage::Database;

use crate::error::SessionError;
use crate::session::Session;
use crate::Result;

// Storage keys are part of the on-disk contract and keep the server's
// naming for the user record.
const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "usuario";
const ID_KEY: &str = "id";
const MENU_KEY: &str = "menu";
const EMAIL_KEY: &str = "email";

pub struct SessionManager {
    api: Arc<dyn Api>,
    uploader: Arc<dyn FileUploader>,
    /// Durable key-value store
    db: Database,
    /// The one active session, if any
    session: Arc<RwLock<Option<Session>>>,
    /// Generation counter. Login/renewal capture it before their request and
    /// commit only if it is unchanged, so a stale response can never clobber
    /// a session established after it was issued.
    epoch: Arc<AtomicU64>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn Api>, uploader: Arc<dyn FileUploader>, db: Database) -> Self {
        Self {
            api,
            uploader,
            db,
            session: Arc::new(RwLock::new(None)),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Restore the session persisted by a previous run.
    ///
    /// No persisted token means logged out; any leftover session keys are
    /// removed so storage and memory agree. Malformed persisted JSON fails
    /// closed the same way.
    pub fn load_from_storage(&self) -> Result<()> {
        let token = match self.db.get(TOKEN_KEY)? {
            Some(token) if !token.is_empty() => token,
            _ => {
                self.clear_storage()?;
                return Ok(());
            }
        };

        let user: User = match self.db.get(USER_KEY)?.as_deref().map(serde_json::from_str) {
            Some(Ok(user)) => user,
            _ => {
                tracing::warn!("Persisted user record missing or malformed, clearing session");
                self.clear_storage()?;
                return Ok(());
            }
        };

        let menu: Menu = match self.db.get(MENU_KEY)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(menu) => menu,
                Err(_) => {
                    tracing::warn!("Persisted menu malformed, clearing session");
                    self.clear_storage()?;
                    return Ok(());
                }
            },
            None => Vec::new(),
        };

        tracing::debug!(user_id = %user.id, "Restored session from storage");
        *self.session.write() = Some(Session::new(token, user, menu));

        Ok(())
    }

    /// Authenticate with local credentials.
    ///
    /// With `remember` the email is stored for future prefill; without it any
    /// previously remembered email is forgotten. This happens regardless of
    /// whether the login itself succeeds.
    pub async fn login(&self, credentials: &Credentials, remember: bool) -> Result<Session> {
        if remember {
            self.db.set(EMAIL_KEY, &credentials.email)?;
        } else {
            self.db.remove(EMAIL_KEY)?;
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        let response = self.api.login(credentials).await?;
        self.commit_login(epoch, response)
    }

    /// Authenticate with a federated Google identity token.
    pub async fn login_with_google(&self, id_token: &str) -> Result<Session> {
        let epoch = self.epoch.load(Ordering::SeqCst);
        let response = self.api.login_with_google(id_token).await?;
        self.commit_login(epoch, response)
    }

    /// Exchange the current token for a fresh one. The stored user record and
    /// menu are left untouched.
    ///
    /// Renewal failure is a hard error; callers decide whether to send the
    /// user back to the login screen.
    pub async fn renew_token(&self) -> Result<String> {
        let token = self.token().ok_or(SessionError::NotLoggedIn)?;
        let epoch = self.epoch.load(Ordering::SeqCst);

        let response = self.api.renew_token(&token).await?;

        let mut guard = self.session.write();
        if self
            .epoch
            .compare_exchange(epoch, epoch + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::Superseded);
        }

        let session = guard.as_mut().ok_or(SessionError::NotLoggedIn)?;
        session.token = response.token.clone();
        self.db.set(TOKEN_KEY, &response.token)?;

        tracing::info!("Token renewed");

        Ok(response.token)
    }

    pub fn is_logged(&self) -> bool {
        self.session
            .read()
            .as_ref()
            .is_some_and(|s| s.is_logged())
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.read().as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.session
            .read()
            .as_ref()
            .filter(|s| s.is_logged())
            .map(|s| s.token.clone())
    }

    pub fn menu(&self) -> Option<Menu> {
        self.session.read().as_ref().map(|s| s.menu.clone())
    }

    /// Email stored by a previous remember-me login, for prefill.
    pub fn remembered_email(&self) -> Result<Option<String>> {
        Ok(self.db.get(EMAIL_KEY)?)
    }

    /// Remove all session keys from storage. The remembered email survives.
    pub fn clear_storage(&self) -> Result<()> {
        self.db.remove(TOKEN_KEY)?;
        self.db.remove(USER_KEY)?;
        self.db.remove(ID_KEY)?;
        self.db.remove(MENU_KEY)?;
        Ok(())
    }

    /// Drop the in-memory session and its durable copy.
    pub fn logout(&self) -> Result<()> {
        {
            let mut guard = self.session.write();
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *guard = None;
        }
        self.clear_storage()?;

        tracing::info!("Logged out");

        Ok(())
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        let created = self.api.create_user(user).await?;
        tracing::info!(user_id = %created.id, email = %created.email, "Created user");
        Ok(created)
    }

    /// Update a user record. When the record is the logged-in user's, the
    /// in-memory and persisted session are refreshed as well (token and menu
    /// unchanged).
    pub async fn update_user(&self, user: &User) -> Result<User> {
        let token = self.token().ok_or(SessionError::NotLoggedIn)?;
        let updated = self.api.update_user(&token, user).await?;

        self.merge_into_session(&updated)?;

        tracing::info!(user_id = %updated.id, "Updated user");

        Ok(updated)
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let token = self.token().ok_or(SessionError::NotLoggedIn)?;
        self.api.delete_user(&token, id).await?;
        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    pub async fn list_users(&self, from: u32) -> Result<UserPage> {
        Ok(self.api.list_users(from).await?)
    }

    pub async fn search_users(&self, term: &str) -> Result<Vec<User>> {
        Ok(self.api.search_users(term).await?)
    }

    /// Upload a new profile image through the file-upload collaborator and
    /// merge the returned record into the session when it is the logged-in
    /// user's.
    pub async fn change_avatar(&self, file: &Path, id: &str) -> Result<User> {
        let updated = self.uploader.upload_user_image(file, id).await?;

        self.merge_into_session(&updated)?;

        Ok(updated)
    }

    fn commit_login(&self, epoch: u64, response: LoginResponse) -> Result<Session> {
        let mut guard = self.session.write();
        if self
            .epoch
            .compare_exchange(epoch, epoch + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::Superseded);
        }

        let session = Session::new(response.token, response.user, response.menu);
        self.persist_session(&response.id, &session)?;

        tracing::info!(user_id = %session.user.id, "Logged in");

        *guard = Some(session.clone());
        Ok(session)
    }

    fn merge_into_session(&self, updated: &User) -> Result<()> {
        let mut guard = self.session.write();
        if let Some(session) = guard.as_mut() {
            if session.user.id == updated.id {
                session.user = updated.clone();
                self.db.set(ID_KEY, &updated.id)?;
                self.db.set(USER_KEY, &serde_json::to_string(updated)?)?;
            }
        }
        Ok(())
    }

    fn persist_session(&self, id: &str, session: &Session) -> Result<()> {
        self.db.set(ID_KEY, id)?;
        self.db.set(TOKEN_KEY, &session.token)?;
        self.db.set(USER_KEY, &serde_json::to_string(&session.user)?)?;
        self.db.set(MENU_KEY, &serde_json::to_string(&session.menu)?)?;
        Ok(())
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            uploader: Arc::clone(&self.uploader),
            db: self.db.clone(),
            session: Arc::clone(&self.session),
            epoch: Arc::clone(&self.epoch),
        }
    }
}
