//! Dashboard facade
//!
//! Wires storage, API client and session manager together and owns the
//! presentation policy: errors become modal notifications here, and a
//! failed renewal or a logout sends the user back to the login screen.

use std::path::Path;
use std::sync::Arc;
use url::Url;

use mediboard_api::{
    Api, ApiClient, Credentials, FileUploader, HttpFileUploader, Menu, NewUser, User, UserPage,
};
use mediboard_session::{Session, SessionError, SessionManager};
use mediboard_storage::Database;

use crate::config::{default_menu, Config};
use crate::notify::{Navigator, Notification, Notifier, Route};
use crate::{CoreError, Result};

pub struct Dashboard {
    config: Config,
    session_manager: SessionManager,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl Dashboard {
    /// Wire up the client against the configured API and database file.
    pub fn new(
        config: Config,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let api_url = Url::parse(&config.api_url)
            .map_err(|e| CoreError::Config(format!("invalid api_url: {e}")))?;
        let api: Arc<dyn Api> = Arc::new(ApiClient::new(api_url.clone())?);
        let uploader: Arc<dyn FileUploader> = Arc::new(HttpFileUploader::new(api_url)?);
        let db = Database::open(&config.database_path)?;

        Ok(Self::with_collaborators(
            config, api, uploader, db, notifier, navigator,
        ))
    }

    /// Same wiring over explicit collaborators (tests inject fakes here).
    pub fn with_collaborators(
        config: Config,
        api: Arc<dyn Api>,
        uploader: Arc<dyn FileUploader>,
        db: Database,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session_manager = SessionManager::new(api, uploader, db);

        Self {
            config,
            session_manager,
            notifier,
            navigator,
        }
    }

    /// Restore any persisted session. Called once at process start.
    pub fn initialize(&self) -> Result<()> {
        self.session_manager.load_from_storage()?;

        tracing::info!(
            api_url = %self.config.api_url,
            logged = self.session_manager.is_logged(),
            "Initialized dashboard client"
        );

        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }

    pub fn is_logged(&self) -> bool {
        self.session_manager.is_logged()
    }

    /// Email to prefill on the login screen, when remembered.
    pub fn remembered_email(&self) -> Result<Option<String>> {
        Ok(self.session_manager.remembered_email()?)
    }

    /// Sidebar menu: the session's when logged in, the build default otherwise.
    pub fn menu(&self) -> Menu {
        match self.session_manager.menu() {
            Some(menu) if !menu.is_empty() => menu,
            _ => default_menu(),
        }
    }

    pub async fn login(&self, credentials: &Credentials, remember: bool) -> Result<Session> {
        match self.session_manager.login(credentials, remember).await {
            Ok(session) => Ok(session),
            Err(e) => {
                self.notify_error(&e);
                Err(e.into())
            }
        }
    }

    pub async fn login_with_google(&self, id_token: &str) -> Result<Session> {
        match self.session_manager.login_with_google(id_token).await {
            Ok(session) => Ok(session),
            Err(e) => {
                self.notify_error(&e);
                Err(e.into())
            }
        }
    }

    /// Renew the session token. On failure the user is told and sent back
    /// to the login screen.
    pub async fn renew_token(&self) -> Result<String> {
        match self.session_manager.renew_token().await {
            Ok(token) => Ok(token),
            Err(e) => {
                self.notifier
                    .notify(Notification::error("Error", "Could not renew the token"));
                self.navigator.navigate(Route::Login);
                Err(e.into())
            }
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.session_manager.logout()?;
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        match self.session_manager.create_user(user).await {
            Ok(created) => {
                self.notifier.notify(Notification::success(
                    "Success",
                    &format!("User {} created", created.email),
                ));
                Ok(created)
            }
            Err(e) => {
                self.notify_error(&e);
                Err(e.into())
            }
        }
    }

    pub async fn update_user(&self, user: &User) -> Result<User> {
        match self.session_manager.update_user(user).await {
            Ok(updated) => {
                self.notifier.notify(Notification::success(
                    "Success",
                    &format!("User {} updated", updated.name),
                ));
                Ok(updated)
            }
            Err(e) => {
                self.notify_error(&e);
                Err(e.into())
            }
        }
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        Ok(self.session_manager.delete_user(id).await?)
    }

    pub async fn list_users(&self, from: u32) -> Result<UserPage> {
        Ok(self.session_manager.list_users(from).await?)
    }

    pub async fn search_users(&self, term: &str) -> Result<Vec<User>> {
        Ok(self.session_manager.search_users(term).await?)
    }

    pub async fn change_avatar(&self, file: &Path, id: &str) -> Result<User> {
        match self.session_manager.change_avatar(file, id).await {
            Ok(updated) => {
                self.notifier.notify(Notification::success(
                    "Success",
                    &format!("Image of {} updated", updated.email),
                ));
                Ok(updated)
            }
            Err(e) => {
                self.notify_error(&e);
                Err(e.into())
            }
        }
    }

    /// Server-reported errors keep their `mensaje` as the modal title when a
    /// validation detail exists, matching how the screens present them.
    fn notify_error(&self, err: &SessionError) {
        let notification = match err {
            SessionError::Api(api) => match (api.server_message(), api.detail()) {
                (Some(message), Some(detail)) => Notification::error(message, detail),
                (Some(message), None) => Notification::error("Error", message),
                _ => Notification::error("Error", &api.to_string()),
            },
            other => Notification::error("Error", &other.to_string()),
        };

        self.notifier.notify(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mediboard_api::{ApiError, LoginResponse, RenewResponse, Role, StatusCode};
    use crate::Severity;
    use parking_lot::Mutex;
    use std::path::PathBuf;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@test.com".to_string(),
            image: None,
            role: Role::Admin,
            google: false,
        }
    }

    struct FakeApi {
        fail: bool,
        fail_renew: bool,
    }

    #[async_trait]
    impl Api for FakeApi {
        async fn login(&self, _credentials: &Credentials) -> mediboard_api::Result<LoginResponse> {
            if self.fail {
                return Err(ApiError::Server {
                    status: StatusCode::BAD_REQUEST,
                    message: "Credenciales incorrectas".to_string(),
                    detail: None,
                });
            }
            Ok(LoginResponse {
                id: "u1".to_string(),
                token: "jwt-1".to_string(),
                user: user(),
                menu: Vec::new(),
            })
        }

        async fn login_with_google(&self, _id_token: &str) -> mediboard_api::Result<LoginResponse> {
            self.login(&Credentials {
                email: String::new(),
                password: String::new(),
            })
            .await
        }

        async fn renew_token(&self, _token: &str) -> mediboard_api::Result<RenewResponse> {
            if self.fail || self.fail_renew {
                return Err(ApiError::Server {
                    status: StatusCode::UNAUTHORIZED,
                    message: "Token caducado".to_string(),
                    detail: None,
                });
            }
            Ok(RenewResponse {
                token: "jwt-2".to_string(),
            })
        }

        async fn create_user(&self, new_user: &NewUser) -> mediboard_api::Result<User> {
            if self.fail {
                return Err(ApiError::Server {
                    status: StatusCode::BAD_REQUEST,
                    message: "Error al crear usuario".to_string(),
                    detail: Some("email already in use".to_string()),
                });
            }
            let mut created = user();
            created.email = new_user.email.clone();
            Ok(created)
        }

        async fn update_user(&self, _token: &str, user: &User) -> mediboard_api::Result<User> {
            Ok(user.clone())
        }

        async fn delete_user(&self, _token: &str, _id: &str) -> mediboard_api::Result<()> {
            Ok(())
        }

        async fn list_users(&self, _from: u32) -> mediboard_api::Result<UserPage> {
            Ok(UserPage {
                users: Vec::new(),
                total: 0,
            })
        }

        async fn search_users(&self, _term: &str) -> mediboard_api::Result<Vec<User>> {
            Ok(Vec::new())
        }
    }

    struct FakeUploader;

    #[async_trait]
    impl FileUploader for FakeUploader {
        async fn upload_user_image(
            &self,
            _file: &Path,
            _user_id: &str,
        ) -> mediboard_api::Result<User> {
            let mut updated = user();
            updated.image = Some("u1.png".to_string());
            Ok(updated)
        }
    }

    #[derive(Default)]
    struct Recorder {
        notifications: Mutex<Vec<Notification>>,
        routes: Mutex<Vec<Route>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, notification: Notification) {
            self.notifications.lock().push(notification);
        }
    }

    impl Navigator for Recorder {
        fn navigate(&self, route: Route) {
            self.routes.lock().push(route);
        }
    }

    fn dashboard_with(api: FakeApi) -> (Dashboard, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let config = Config::new(PathBuf::from("/tmp/mediboard-test"));
        let dashboard = Dashboard::with_collaborators(
            config,
            Arc::new(api),
            Arc::new(FakeUploader),
            Database::open_in_memory().unwrap(),
            recorder.clone(),
            recorder.clone(),
        );
        (dashboard, recorder)
    }

    fn dashboard(fail: bool) -> (Dashboard, Arc<Recorder>) {
        dashboard_with(FakeApi {
            fail,
            fail_renew: false,
        })
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "ada@test.com".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_failure_notifies_with_server_message() {
        let (dashboard, recorder) = dashboard(true);

        let result = dashboard.login(&credentials(), false).await;
        assert!(result.is_err());
        assert!(!dashboard.is_logged());

        let notifications = recorder.notifications.lock();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Error");
        assert_eq!(notifications[0].message, "Credenciales incorrectas");
        assert_eq!(notifications[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_renew_failure_redirects_to_login() {
        let (dashboard, recorder) = dashboard_with(FakeApi {
            fail: false,
            fail_renew: true,
        });
        dashboard.login(&credentials(), false).await.unwrap();

        let result = dashboard.renew_token().await;
        assert!(result.is_err());

        assert_eq!(recorder.routes.lock().as_slice(), &[Route::Login]);
        let notifications = recorder.notifications.lock();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].message, "Could not renew the token");
    }

    #[tokio::test]
    async fn test_logout_navigates_to_login() {
        let (dashboard, recorder) = dashboard(false);
        dashboard.login(&credentials(), false).await.unwrap();

        dashboard.logout().unwrap();
        assert!(!dashboard.is_logged());
        assert_eq!(recorder.routes.lock().as_slice(), &[Route::Login]);
    }

    #[tokio::test]
    async fn test_menu_falls_back_to_default() {
        let (dashboard, _recorder) = dashboard(false);

        // Logged out: static default
        assert_eq!(dashboard.menu(), default_menu());

        // Logged in with an empty server menu: still the default
        dashboard.login(&credentials(), false).await.unwrap();
        assert_eq!(dashboard.menu(), default_menu());
    }

    #[tokio::test]
    async fn test_create_user_notifications() {
        let (dashboard, recorder) = dashboard(false);

        let new_user = NewUser {
            name: "Bob".to_string(),
            email: "bob@test.com".to_string(),
            password: "secret".to_string(),
            role: Role::User,
        };
        dashboard.create_user(&new_user).await.unwrap();

        let notifications = recorder.notifications.lock();
        assert_eq!(notifications[0].severity, Severity::Success);
        assert_eq!(notifications[0].message, "User bob@test.com created");
    }

    #[tokio::test]
    async fn test_create_user_error_uses_server_title_and_detail() {
        let (dashboard, recorder) = dashboard(true);

        let new_user = NewUser {
            name: "Bob".to_string(),
            email: "bob@test.com".to_string(),
            password: "secret".to_string(),
            role: Role::User,
        };
        let result = dashboard.create_user(&new_user).await;
        assert!(result.is_err());

        let notifications = recorder.notifications.lock();
        assert_eq!(notifications[0].title, "Error al crear usuario");
        assert_eq!(notifications[0].message, "email already in use");
    }
}
