//! The Megaplan client facade.
//!
//! [`Client`] holds the server settings, one shared HTTP connection pool and
//! the credential pair. Every domain method shapes its arguments into a
//! parameter mapping and returns an unsent [`Request`]; the caller decides
//! when to `send` it.
//!
//! # Authentication
//!
//! A client starts anonymous. It becomes authenticated either through
//! [`Client::auth`] or by injecting a saved pair with
//! [`Client::set_credentials`]. Observers subscribe with
//! [`Client::subscribe_auth`] and see every transition as an
//! [`AuthEvent`]. Any signed method called while anonymous fails with
//! [`MegaplanError::NotAuthenticated`] before touching the network.
//!
//! # Example
//!
//! ```ignore
//! let server = ServerConfig::new("mycompany.megaplan.ru")?;
//! let mut client = Client::new(server)?;
//! client.auth(AuthParams::password("ivan", "secret")).await?;
//!
//! let tasks: Vec<Task> = client
//!     .tasks(&TaskListParams::new().with_folder(Folder::Owner))?
//!     .send_as()
//!     .await?;
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tokio::sync::watch;

use crate::config::ServerConfig;
use crate::dicts::{ActionType, SubjectType, AUTH_URI};
use crate::error::MegaplanError;
use crate::models::Credentials;
use crate::params::{
    self, AuthParams, ContractorListParams, HistoryParams, Params, TaskCreateParams,
    TaskListParams,
};
use crate::request::{Request, USER_AGENT};
use crate::utils::{self, EntityId};

/// A change of the client's authentication state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    /// No credentials yet.
    Anonymous,
    /// Credentials were obtained or injected.
    Authenticated(Credentials),
    /// A login attempt failed; carries the error message.
    Failed(String),
}

/// Client for the Megaplan API.
///
/// Cloning is cheap. A clone shares the HTTP pool and the auth observers
/// but keeps its own copy of the credentials.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    server: Arc<ServerConfig>,
    credentials: Option<Credentials>,
    auth_events: Arc<watch::Sender<AuthEvent>>,
}

impl Client {
    /// Creates an anonymous client for a server.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::HttpClient` if the HTTP client fails to
    /// initialize.
    pub fn new(server: ServerConfig) -> Result<Self, MegaplanError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(MegaplanError::HttpClient)?;
        let (auth_events, _) = watch::channel(AuthEvent::Anonymous);

        Ok(Self {
            http,
            server: Arc::new(server),
            credentials: None,
            auth_events: Arc::new(auth_events),
        })
    }

    /// Creates a client that resumes an existing session.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::HttpClient` if the HTTP client fails to
    /// initialize, or `MegaplanError::Validation` if either half of the
    /// pair is empty.
    pub fn with_credentials(
        server: ServerConfig,
        credentials: Credentials,
    ) -> Result<Self, MegaplanError> {
        let mut client = Self::new(server)?;
        client.store_credentials(credentials)?;
        Ok(client)
    }

    /// The server this client talks to.
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// The current credentials, if any.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns true once credentials are set.
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Subscribes to authentication events.
    ///
    /// The receiver first observes the current state. Injected credentials
    /// are seen on the receiver's next poll, not synchronously.
    pub fn subscribe_auth(&self) -> watch::Receiver<AuthEvent> {
        self.auth_events.subscribe()
    }

    /// Injects a saved credential pair and notifies observers.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Validation` if either value is empty.
    pub fn set_credentials(
        &mut self,
        access_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<(), MegaplanError> {
        self.store_credentials(Credentials::new(access_id, secret_key))
    }

    fn store_credentials(&mut self, credentials: Credentials) -> Result<(), MegaplanError> {
        if credentials.access_id.is_empty() || credentials.secret_key.is_empty() {
            return Err(MegaplanError::validation(
                "access_id and secret_key must both be set",
            ));
        }

        tracing::info!(access_id = %credentials.access_id, "Megaplan credentials set");
        self.credentials = Some(credentials.clone());
        self.auth_events
            .send_replace(AuthEvent::Authenticated(credentials));
        Ok(())
    }

    /// Logs in and stores the issued credentials.
    ///
    /// Observers receive [`AuthEvent::Authenticated`] on success and
    /// [`AuthEvent::Failed`] on failure.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Validation` for empty login data without any
    /// network I/O, otherwise any send failure of the authorization call.
    pub async fn auth(&mut self, params: AuthParams) -> Result<Credentials, MegaplanError> {
        let request = self.request(AUTH_URI, params.to_params()?)?;
        tracing::debug!(?params, "Authorizing with Megaplan");

        let result = match request.send_as::<Credentials>().await {
            Ok(credentials) => self.store_credentials(credentials.clone()).map(|_| credentials),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            let message = e.sanitized_display(params.secret());
            tracing::warn!(error = %message, "Megaplan authorization failed");
            self.auth_events.send_replace(AuthEvent::Failed(message));
        }
        result
    }

    /// Builds a request for `uri`, signing it unless it is the
    /// authorization call.
    fn request(&self, uri: &str, data: Params) -> Result<Request, MegaplanError> {
        let signed = uri != AUTH_URI;
        if signed && self.credentials.is_none() {
            return Err(MegaplanError::NotAuthenticated);
        }

        let resolved = utils::subst_uri(uri)?;
        let request = Request::new(self.http.clone(), Arc::clone(&self.server), resolved, data);

        match self.credentials.as_ref().filter(|_| signed) {
            Some(credentials) => request.sign(credentials),
            None => Ok(request),
        }
    }

    fn free_form<T: Serialize + ?Sized>(&self, uri: &str, params: &T) -> Result<Request, MegaplanError> {
        self.request(uri, params::to_params(params)?)
    }

    fn add_comment(
        &self,
        subject_type: SubjectType,
        subject_id: EntityId,
        text: &str,
        hours: Option<u32>,
    ) -> Result<Request, MegaplanError> {
        if subject_id.value() == 0 || text.trim().is_empty() {
            return Err(MegaplanError::validation(
                "can't post empty comment to nothing",
            ));
        }

        let subject_id = if subject_type.normalizes_ids() {
            subject_id.normalize()
        } else {
            subject_id
        };
        let data = json!({
            "subject_type": subject_type,
            "subject_id": subject_id,
            "model": {
                "text": text,
                "work": hours.unwrap_or(0),
            },
        });
        self.request("::comment/create.api", params::to_params(&data)?)
    }

    // --- Common ---

    /// Quick search across all entities. The `qs` key is sent verbatim.
    pub fn search(&self, text: &str) -> Result<Request, MegaplanError> {
        let data = params::to_params(&json!({ "qs": text }))?;
        Ok(self.request("::search/quick.api", data)?.verbatim())
    }

    /// Server time; yields the `datetime` value.
    pub fn datetime(&self) -> Result<Request, MegaplanError> {
        Ok(self
            .request("::system/datetime.api", Params::new())?
            .pluck("datetime"))
    }

    /// Change history of one subject, or of everything; yields `changes`.
    pub fn history(&self, params: &HistoryParams) -> Result<Request, MegaplanError> {
        let uri = format!("::history{}", params.endpoint());
        Ok(self.request(&uri, params.to_params()?)?.pluck("changes"))
    }

    /// Sends feedback to Megaplan.
    pub fn feedback(&self, message: &str) -> Result<Request, MegaplanError> {
        self.request(
            "::system/feedback.api",
            params::to_params(&json!({ "message": message }))?,
        )
    }

    /// Answers a notification reaction token.
    pub fn react(&self, token: &str, message: &str) -> Result<Request, MegaplanError> {
        let data = json!({ "token": token, "params": { "text": message } });
        self.request("::reaction/do.api", params::to_params(&data)?)
    }

    // --- Tasks ---

    /// Lists tasks; yields `tasks`.
    pub fn tasks(&self, params: &TaskListParams) -> Result<Request, MegaplanError> {
        Ok(self.request("::task/list.api", params.to_params()?)?.pluck("tasks"))
    }

    /// Task card.
    pub fn task(&self, id: impl Into<EntityId>) -> Result<Request, MegaplanError> {
        let id: EntityId = id.into();
        self.free_form("::task/card.api", &json!({ "id": id }))
    }

    /// Creates a task; yields `task`.
    pub fn task_create(&self, params: &TaskCreateParams) -> Result<Request, MegaplanError> {
        let data = json!({ "model": params.to_model()? });
        Ok(self
            .request("::task/create.api", params::to_params(&data)?)?
            .pluck("task"))
    }

    /// Applies an action to a task.
    pub fn task_action(
        &self,
        id: impl Into<EntityId>,
        action: ActionType,
    ) -> Result<Request, MegaplanError> {
        let id: EntityId = id.into();
        let data = json!({ "id": id.normalize(), "action": action });
        self.free_form("::task/action.api", &data)
    }

    /// Comments on a task.
    pub fn task_comments(&self, id: impl Into<EntityId>) -> Result<Request, MegaplanError> {
        let id: EntityId = id.into();
        let data = json!({ "subject_type": SubjectType::Task, "subject_id": id });
        self.free_form("::comment/list.api", &data)
    }

    /// Comments on a task, logging `hours` of work.
    pub fn task_comment_create(
        &self,
        id: impl Into<EntityId>,
        text: &str,
        hours: Option<u32>,
    ) -> Result<Request, MegaplanError> {
        self.add_comment(SubjectType::Task, id.into(), text, hours)
    }

    // --- Projects ---

    /// Lists projects.
    pub fn projects<T: Serialize + ?Sized>(&self, params: &T) -> Result<Request, MegaplanError> {
        self.free_form("::project/list.api", params)
    }

    /// Creates a project.
    pub fn project_create<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::project/Create.api", params)
    }

    /// Edits a project.
    pub fn project_edit<T: Serialize + ?Sized>(&self, params: &T) -> Result<Request, MegaplanError> {
        self.free_form("::project/edit.api", params)
    }

    /// Applies an action to a project.
    pub fn project_action<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::project/action.api", params)
    }

    /// Comments on a project.
    pub fn project_comment_create(
        &self,
        id: impl Into<EntityId>,
        text: &str,
        hours: Option<u32>,
    ) -> Result<Request, MegaplanError> {
        self.add_comment(SubjectType::Project, id.into(), text, hours)
    }

    // --- Todo lists and events ---

    /// Lists todo lists.
    pub fn todolists<T: Serialize + ?Sized>(&self, params: &T) -> Result<Request, MegaplanError> {
        self.free_form("::todo/list.api", params)
    }

    /// Creates a todo list.
    pub fn todolist_create(&self, name: &str) -> Result<Request, MegaplanError> {
        self.free_form("::todo/create.api", &json!({ "name": name }))
    }

    /// Renames a todo list.
    pub fn todolist_edit<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::todo/edit.api", params)
    }

    /// Deletes a todo list.
    pub fn todolist_delete<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::todo/delete.api", params)
    }

    /// Lists events.
    pub fn events<T: Serialize + ?Sized>(&self, params: &T) -> Result<Request, MegaplanError> {
        self.free_form("::event/list.api", params)
    }

    /// Event card.
    pub fn event_card<T: Serialize + ?Sized>(&self, params: &T) -> Result<Request, MegaplanError> {
        self.free_form("::event/card.api", params)
    }

    /// Creates an event.
    pub fn event_create<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::event/create.api", params)
    }

    /// Edits an event.
    pub fn event_edit<T: Serialize + ?Sized>(&self, params: &T) -> Result<Request, MegaplanError> {
        self.free_form("::event/edit.api", params)
    }

    // --- Staff ---

    /// Lists employees.
    pub fn employees<T: Serialize + ?Sized>(&self, params: &T) -> Result<Request, MegaplanError> {
        self.free_form("::employee/list.api", params)
    }

    /// Employee card.
    pub fn employee_card<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::employee/card.api", params)
    }

    /// Creates an employee.
    pub fn employee_create<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::employee/create.api", params)
    }

    /// Edits an employee.
    pub fn employee_edit<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::employee/edit.api", params)
    }

    /// Lists departments.
    pub fn departments<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::department/list.api", params)
    }

    // --- CRM and trade ---

    /// Creates a deal from an online store order.
    pub fn add_online_store<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form(":trade/Deal/createFromOnlineStore.api", params)
    }

    /// Lists contractors; yields `clients`.
    pub fn contractors(&self, params: &ContractorListParams) -> Result<Request, MegaplanError> {
        Ok(self
            .free_form("::contractor/list.api", params)?
            .pluck("clients"))
    }

    /// Creates or edits a contractor.
    pub fn contractor_save<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::contractor/save.api", params)
    }

    /// Contractor card.
    pub fn contractor_card<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::contractor/card.api", params)
    }

    /// Deletes a contractor.
    pub fn contractor_delete<T: Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> Result<Request, MegaplanError> {
        self.free_form("::contractor/delete.api", params)
    }

    /// Contractor fields, including custom ones.
    pub fn contractor_list_fields(&self) -> Result<Request, MegaplanError> {
        self.request("::contractor/listFields.api", Params::new())
    }

    /// Comments on a contractor. The id is sent as given.
    pub fn contractor_comment_create(
        &self,
        id: impl Into<EntityId>,
        text: &str,
        hours: Option<u32>,
    ) -> Result<Request, MegaplanError> {
        self.add_comment(SubjectType::Contractor, id.into(), text, hours)
    }

    /// Lists deals.
    pub fn deals<T: Serialize + ?Sized>(&self, params: &T) -> Result<Request, MegaplanError> {
        self.free_form("::deal/list.api", params)
    }

    /// Creates or edits a deal.
    pub fn deal_save<T: Serialize + ?Sized>(&self, params: &T) -> Result<Request, MegaplanError> {
        self.free_form("::deal/save.api", params)
    }

    /// Deal card.
    pub fn deal_card<T: Serialize + ?Sized>(&self, params: &T) -> Result<Request, MegaplanError> {
        self.free_form("::deal/card.api", params)
    }

    /// Comments on a deal. The id is sent as given.
    pub fn deal_comment_create(
        &self,
        id: impl Into<EntityId>,
        text: &str,
        hours: Option<u32>,
    ) -> Result<Request, MegaplanError> {
        self.add_comment(SubjectType::Deal, id.into(), text, hours)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("server", &self.server)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerOptions;
    use crate::dicts::Folder;
    use crate::request::ResponseFilter;
    use pretty_assertions::assert_eq;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn signed_client() -> Client {
        let server = ServerConfig::new("a.megaplan.ru").unwrap();
        Client::with_credentials(server, Credentials::new("acc", "secret")).unwrap()
    }

    fn mock_client(mock: &MockServer) -> Client {
        let options = ServerOptions::new("127.0.0.1").with_port(mock.address().port());
        Client::new(ServerConfig::from_options(options).unwrap()).unwrap()
    }

    fn plucked(request: &Request) -> Option<&str> {
        match request.response_filter() {
            ResponseFilter::Key(key) => Some(key),
            _ => None,
        }
    }

    #[test]
    fn test_anonymous_client_rejects_signed_calls() {
        let client = Client::new(ServerConfig::new("a.megaplan.ru").unwrap()).unwrap();
        assert!(!client.is_authenticated());
        let err = assert_err!(client.tasks(&TaskListParams::new()));
        assert!(matches!(err, MegaplanError::NotAuthenticated));
        assert_eq!(err.to_string(), "authenticate first");
        assert!(client.employees(&()).is_err());
    }

    #[test]
    fn test_set_credentials_notifies() {
        let mut client = Client::new(ServerConfig::new("a.megaplan.ru").unwrap()).unwrap();
        let rx = client.subscribe_auth();
        assert_eq!(*rx.borrow(), AuthEvent::Anonymous);

        assert_ok!(client.set_credentials("acc", "secret"));
        assert!(client.is_authenticated());
        assert_eq!(
            *rx.borrow(),
            AuthEvent::Authenticated(Credentials::new("acc", "secret"))
        );

        assert_err!(client.set_credentials("acc", ""));
    }

    #[test]
    fn test_tasks_request_shape() {
        let client = signed_client();
        let request = assert_ok!(client.tasks(&TaskListParams::new().with_folder(Folder::Owner)));
        assert_eq!(request.uri(), "BumsTaskApiV01/Task/list.api");
        assert_eq!(request.body(), "Folder=owner");
        assert_eq!(plucked(&request), Some("tasks"));
        assert!(request.auth_key().unwrap().starts_with("acc:"));
    }

    #[test]
    fn test_search_is_verbatim() {
        let request = signed_client().search("elephant").unwrap();
        assert_eq!(request.uri(), "BumsCommonApiV01/Search/quick.api");
        assert_eq!(request.body(), "qs=elephant");
    }

    #[test]
    fn test_history_endpoint_by_subject() {
        let client = signed_client();
        let all = client.history(&HistoryParams::all()).unwrap();
        assert_eq!(all.uri(), "BumsCommonApiV01/History/all.api");
        assert_eq!(plucked(&all), Some("changes"));

        let one = client.history(&HistoryParams::task(5u32)).unwrap();
        assert_eq!(one.uri(), "BumsCommonApiV01/History/list.api");
        assert_eq!(one.body(), "SubjectId=1000005&SubjectType=task");
    }

    #[test]
    fn test_task_create_wraps_model() {
        let request = signed_client()
            .task_create(&TaskCreateParams::new("Buy").with_responsible(2u32))
            .unwrap();
        assert_eq!(request.uri(), "BumsTaskApiV01/Task/create.api");
        assert_eq!(
            request.body(),
            "Model%5BIsGroup%5D=0&Model%5BName%5D=Buy&Model%5BResponsible%5D=1000002"
        );
        assert_eq!(plucked(&request), Some("task"));
    }

    #[test]
    fn test_comment_validation() {
        let client = signed_client();
        assert_err!(client.task_comment_create(5u32, "", None));
        assert_err!(client.task_comment_create(0u32, "text", None));
        assert_err!(client.deal_comment_create(5u32, "   ", Some(1)));
    }

    #[test]
    fn test_comment_id_normalization_by_subject() {
        let client = signed_client();
        let task = client.task_comment_create(5u32, "Hi", None).unwrap();
        assert_eq!(task.uri(), "BumsCommonApiV01/Comment/create.api");
        assert_eq!(
            task.body(),
            "Model%5BText%5D=Hi&Model%5BWork%5D=0&SubjectId=1000005&SubjectType=task"
        );

        let deal = client.deal_comment_create(5u32, "Hi", Some(2)).unwrap();
        assert_eq!(
            deal.body(),
            "Model%5BText%5D=Hi&Model%5BWork%5D=2&SubjectId=5&SubjectType=deal"
        );
    }

    #[test]
    fn test_free_form_drops_nulls_and_rejects_scalars() {
        let client = signed_client();
        let request = client
            .projects(&json!({"limit": 5, "status": null}))
            .unwrap();
        assert_eq!(request.uri(), "BumsProjectApiV01/Project/list.api");
        assert_eq!(request.body(), "Limit=5");

        assert_err!(client.deals(&42));
    }

    #[test]
    fn test_shortcut_resolution_for_every_area() {
        let client = signed_client();
        let cases = [
            (client.todolist_create("Home").unwrap(), "BumsTimeApiV01/TodoList/create.api"),
            (client.event_card(&()).unwrap(), "BumsTimeApiV01/Event/card.api"),
            (client.departments(&()).unwrap(), "BumsStaffApiV01/Department/list.api"),
            (
                client.add_online_store(&()).unwrap(),
                "BumsTradeApiV01/Deal/createFromOnlineStore.api",
            ),
            (
                client.contractor_list_fields().unwrap(),
                "BumsCrmApiV01/Contractor/listFields.api",
            ),
            (client.react("t", "ok").unwrap(), "SdfNotify/ReactionApi/do.api"),
            (client.datetime().unwrap(), "BumsCommonApiV01/System/datetime.api"),
        ];
        for (request, uri) in cases {
            assert_eq!(request.uri(), uri);
        }
    }

    #[tokio::test]
    async fn test_auth_stores_credentials() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/BumsCommonApiV01/User/authorize.api"))
            .and(body_string(
                "Login=ivan&Password=5f4dcc3b5aa765d61d8327deb882cf99",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": {"code": "ok"},
                "data": {"AccessId": "acc", "SecretKey": "secret", "UserId": 1, "EmployeeId": 1000001}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut client = mock_client(&mock_server);
        let mut rx = client.subscribe_auth();
        let credentials = client
            .auth(AuthParams::password("ivan", "password"))
            .await
            .unwrap();

        assert_eq!(credentials.access_id, "acc");
        assert_eq!(credentials.employee_id.as_deref(), Some("1000001"));
        assert!(client.is_authenticated());
        assert!(rx.has_changed().unwrap());
        assert!(matches!(&*rx.borrow_and_update(), AuthEvent::Authenticated(c) if c.secret_key == "secret"));

        let received = mock_server.received_requests().await.unwrap();
        assert!(received[0].headers.get("X-Authorization").is_none());
    }

    #[tokio::test]
    async fn test_auth_failure_notifies() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": {"code": "error", "message": "Wrong password"}
            })))
            .mount(&mock_server)
            .await;

        let mut client = mock_client(&mock_server);
        let rx = client.subscribe_auth();
        let err = client
            .auth(AuthParams::password("ivan", "bad"))
            .await
            .unwrap_err();

        assert!(matches!(err, MegaplanError::Remote { .. }));
        assert!(!client.is_authenticated());
        assert!(matches!(&*rx.borrow(), AuthEvent::Failed(msg) if msg.contains("Wrong password")));
    }

    #[tokio::test]
    async fn test_auth_requires_login_data() {
        let mut client = Client::new(ServerConfig::new("a.megaplan.ru").unwrap()).unwrap();
        let err = client.auth(AuthParams::password("", "")).await.unwrap_err();
        assert!(err.is_usage());
    }
}
