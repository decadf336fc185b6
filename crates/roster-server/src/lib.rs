//! HTTP resource layer for Roster.
//!
//! Exposes an axum [`Router`] serving the `/contacts` collection backed by
//! any [`ContactStore`], with `ETag`-based conditional requests.

pub mod error;
pub mod handlers;
pub mod negotiate;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use roster_core::{ContactId, ContactStore};
use serde::Deserialize;

use handlers::{create, delete, list, update};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  /// Public origin used to build `Location` headers. Derived from `host`
  /// and `port` when unset.
  #[serde(rename = "base_url")]
  pub public_url:    Option<String>,
  /// Contact file loaded at startup and written at shutdown.
  pub contacts_file: Option<PathBuf>,
  /// Generated ids start just above this value.
  pub id_floor:      ContactId,
  /// `max-age` advertised in `Cache-Control`, in seconds.
  pub cache_max_age: u32,
}

impl ServerConfig {
  pub fn base_url(&self) -> String {
    match &self.public_url {
      Some(url) => url.trim_end_matches('/').to_string(),
      None => format!("http://{}:{}", self.host, self.port),
    }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          8080,
      public_url:    None,
      contacts_file: None,
      id_floor:      roster_store_memory::DEFAULT_ID_FLOOR,
      cache_max_age: 3600,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ContactStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the contact collection.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ContactStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/contacts", get(list::handler::<S>).post(create::handler::<S>))
    .route(
      "/contacts/{id}",
      get(handlers::get::handler::<S>)
        .put(update::handler::<S>)
        .delete(delete::handler::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use std::future::Future;

  use roster_core::{Contact, ContactId, ContactStore, Precondition, WriteOutcome};
  use roster_store_memory::MemoryStore;
  use tower::ServiceExt as _;

  fn make_state() -> AppState<MemoryStore> {
    let config = ServerConfig {
      public_url: Some("http://localhost:8080".to_string()),
      ..ServerConfig::default()
    };
    AppState {
      store:  Arc::new(MemoryStore::with_id_floor(config.id_floor)),
      config: Arc::new(config),
    }
  }

  async fn oneshot_raw<S>(
    state:   AppState<S>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> axum::response::Response
  where
    S: ContactStore + Clone + Send + Sync + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
  {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  fn header_str(resp: &axum::response::Response, name: header::HeaderName) -> String {
    resp.headers().get(name).unwrap().to_str().unwrap().to_string()
  }

  const NEW_CONTACT: &str =
    r#"{"id":0,"title":"T","name":"N","email":"e@x.com"}"#;

  /// POST `NEW_CONTACT` as JSON; returns (path, etag).
  async fn create_one(state: &AppState<MemoryStore>) -> (String, String) {
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/contacts",
      vec![(header::CONTENT_TYPE, "application/json")],
      NEW_CONTACT,
    ).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = header_str(&resp, header::LOCATION);
    let path = location.trim_start_matches("http://localhost:8080").to_string();
    (path, header_str(&resp, header::ETAG))
  }

  // ── POST ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_creates_with_generated_id_location_and_etag() {
    let state = make_state();
    let resp  = oneshot_raw(
      state.clone(),
      "POST",
      "/contacts",
      vec![(header::CONTENT_TYPE, "application/json")],
      NEW_CONTACT,
    ).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key(header::ETAG));
    assert_eq!(header_str(&resp, header::CACHE_CONTROL), "max-age=3600");

    let location = header_str(&resp, header::LOCATION);
    let id: u64 = location.rsplit('/').next().unwrap().parse().unwrap();
    assert!(id > 1000, "generated id {id} should be above the floor");
    assert!(location.starts_with("http://localhost:8080/contacts/"), "{location}");
  }

  #[tokio::test]
  async fn post_xml_with_client_id_then_get_it() {
    let state = make_state();
    let body  = "<contact id=\"11\">\
                   <title>contact nickname or title</title>\
                   <name>contact's full name</name>\
                   <email>contact's email address</email>\
                   <phoneNumber>contact's telephone number</phoneNumber>\
                 </contact>";
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/contacts",
      vec![(header::CONTENT_TYPE, "application/xml")],
      body,
    ).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(header_str(&resp, header::LOCATION).ends_with("/contacts/11"));

    let resp = oneshot_raw(state, "GET", "/contacts/11", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let xml = body_string(resp).await;
    assert!(xml.contains("contact's full name"), "{xml}");
  }

  #[tokio::test]
  async fn post_with_existing_id_conflicts_and_keeps_original() {
    let state = make_state();
    state.store.save(Contact::new("Test contact", "Test Name", "none@testing.com").with_id(1))
      .await
      .unwrap();

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/contacts",
      vec![(header::CONTENT_TYPE, "application/json")],
      r#"{"id":1,"title":"intruder"}"#,
    ).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let kept = state.store.find(1).await.unwrap().unwrap();
    assert_eq!(kept.title, "Test contact");
  }

  #[tokio::test]
  async fn post_malformed_body_is_400() {
    let state = make_state();
    let resp  = oneshot_raw(
      state,
      "POST",
      "/contacts",
      vec![(header::CONTENT_TYPE, "application/json")],
      "{not json",
    ).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn post_unsupported_media_type_is_415() {
    let state = make_state();
    let resp  = oneshot_raw(
      state,
      "POST",
      "/contacts",
      vec![(header::CONTENT_TYPE, "text/plain")],
      "hello",
    ).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
  }

  // ── GET by id ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_returns_same_etag_as_create_and_is_stable() {
    let state = make_state();
    let (path, created_etag) = create_one(&state).await;

    for _ in 0..3 {
      let resp = oneshot_raw(
        state.clone(),
        "GET",
        &path,
        vec![(header::ACCEPT, "application/json")],
        "",
      ).await;
      assert_eq!(resp.status(), StatusCode::OK);
      assert_eq!(header_str(&resp, header::ETAG), created_etag);
      let json = body_string(resp).await;
      assert!(json.contains("\"title\":\"T\""), "{json}");
    }
  }

  #[tokio::test]
  async fn get_nonexistent_returns_404() {
    let state = make_state();
    let resp  = oneshot_raw(state, "GET", "/contacts/4242", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn get_non_canonical_id_returns_404() {
    let state = make_state();
    for uri in ["/contacts/0", "/contacts/abc", "/contacts/-3"] {
      let resp = oneshot_raw(state.clone(), "GET", uri, vec![], "").await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
  }

  #[tokio::test]
  async fn conditional_get_with_current_etag_is_not_modified() {
    let state = make_state();
    let (path, etag) = create_one(&state).await;

    let resp = oneshot_raw(
      state.clone(),
      "GET",
      &path,
      vec![(header::IF_NONE_MATCH, etag.as_str())],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(header_str(&resp, header::ETAG), etag);

    let resp = oneshot_raw(
      state,
      "GET",
      &path,
      vec![(header::IF_MATCH, "\"stale\"")],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
  }

  #[tokio::test]
  async fn if_match_governs_when_both_headers_present() {
    let state = make_state();
    let (path, etag) = create_one(&state).await;

    let resp = oneshot_raw(
      state,
      "GET",
      &path,
      vec![
        (header::IF_MATCH, etag.as_str()),
        (header::IF_NONE_MATCH, etag.as_str()),
      ],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── GET collection ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_filters_by_title_case_insensitively() {
    let state = make_state();
    for title in ["a test entry", "Other", "TEST again"] {
      state.store.save(Contact::new(title, "n", "e")).await.unwrap();
    }

    let resp = oneshot_raw(
      state,
      "GET",
      "/contacts?title=test",
      vec![(header::ACCEPT, "application/json")],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let list: roster_core::ContactList =
      serde_json::from_str(&body_string(resp).await).unwrap();
    let titles: Vec<_> = list.contacts.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["a test entry", "TEST again"]);
  }

  #[tokio::test]
  async fn list_with_no_match_is_200_and_empty() {
    let state = make_state();
    state.store.save(Contact::new("something", "n", "e")).await.unwrap();

    let resp = oneshot_raw(state, "GET", "/contacts?title=zzz-no-match", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let xml = body_string(resp).await;
    assert!(roster_xml::parse_list(&xml).unwrap().is_empty(), "{xml}");
  }

  #[tokio::test]
  async fn list_without_filter_returns_everything_as_xml() {
    let state = make_state();
    state.store.save(Contact::new("one", "n", "e")).await.unwrap();
    state.store.save(Contact::new("two", "n", "e")).await.unwrap();

    let resp = oneshot_raw(state, "GET", "/contacts", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = header_str(&resp, header::CONTENT_TYPE);
    assert!(ct.contains("xml"), "Content-Type: {ct}");
    let list = roster_xml::parse_list(&body_string(resp).await).unwrap();
    assert_eq!(list.len(), 2);
  }

  // ── PUT ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn put_with_if_none_match_current_etag_is_412_and_unchanged() {
    let state = make_state();
    let (path, etag) = create_one(&state).await;

    let resp = oneshot_raw(
      state.clone(),
      "PUT",
      &path,
      vec![
        (header::CONTENT_TYPE, "application/json"),
        (header::IF_NONE_MATCH, etag.as_str()),
      ],
      r#"{"title":"changed","name":"N","email":"e@x.com"}"#,
    ).await;
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);

    let resp = oneshot_raw(state, "GET", &path, vec![], "").await;
    assert_eq!(header_str(&resp, header::ETAG), etag);
  }

  #[tokio::test]
  async fn put_with_matching_if_match_returns_new_etag() {
    let state = make_state();
    let (path, etag) = create_one(&state).await;

    let resp = oneshot_raw(
      state.clone(),
      "PUT",
      &path,
      vec![
        (header::CONTENT_TYPE, "application/json"),
        (header::IF_MATCH, etag.as_str()),
      ],
      r#"{"title":"new title","name":"N","email":"e@x.com"}"#,
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let new_etag = header_str(&resp, header::ETAG);
    assert_ne!(new_etag, etag);

    let resp = oneshot_raw(state, "GET", &path, vec![], "").await;
    assert_eq!(header_str(&resp, header::ETAG), new_etag);
  }

  #[tokio::test]
  async fn put_with_unquoted_if_match_is_accepted() {
    let state = make_state();
    let (path, etag) = create_one(&state).await;
    let bare = etag.trim_matches('"').to_string();

    let resp = oneshot_raw(
      state,
      "PUT",
      &path,
      vec![
        (header::CONTENT_TYPE, "application/json"),
        (header::IF_MATCH, bare.as_str()),
      ],
      r#"{"title":"again"}"#,
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn put_with_stale_if_match_returns_412() {
    let state = make_state();
    let (path, _) = create_one(&state).await;

    let resp = oneshot_raw(
      state,
      "PUT",
      &path,
      vec![
        (header::CONTENT_TYPE, "application/json"),
        (header::IF_MATCH, "\"stale-etag\""),
      ],
      r#"{"title":"lost update"}"#,
    ).await;
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
  }

  #[tokio::test]
  async fn put_with_mismatched_body_id_is_400() {
    let state = make_state();
    let (path, _) = create_one(&state).await;

    let resp = oneshot_raw(
      state,
      "PUT",
      &path,
      vec![(header::CONTENT_TYPE, "application/json")],
      r#"{"id":5,"title":"wrong"}"#,
    ).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn put_to_missing_id_is_404_even_with_mismatched_body_id() {
    let state = make_state();
    let resp  = oneshot_raw(
      state,
      "PUT",
      "/contacts/51234",
      vec![(header::CONTENT_TYPE, "application/xml")],
      "<contact id=\"9876545\"><title>newContactTitle</title></contact>",
    ).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── DELETE ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_existing_returns_200_and_get_returns_404() {
    let state = make_state();
    let (path, etag) = create_one(&state).await;

    let resp = oneshot_raw(
      state.clone(),
      "DELETE",
      &path,
      vec![(header::IF_MATCH, etag.as_str())],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = oneshot_raw(state, "GET", &path, vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_never_created_returns_404() {
    let state = make_state();
    let resp  = oneshot_raw(state, "DELETE", "/contacts/777", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_with_stale_if_match_is_412_and_keeps_contact() {
    let state = make_state();
    let (path, _) = create_one(&state).await;

    let resp = oneshot_raw(
      state.clone(),
      "DELETE",
      &path,
      vec![(header::IF_MATCH, "\"stale\"")],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);

    let resp = oneshot_raw(state, "GET", &path, vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn post_when_ids_are_exhausted_returns_400() {
    let config = ServerConfig::default();
    let state = AppState {
      store:  Arc::new(MemoryStore::with_id_floor(u64::MAX - 1)),
      config: Arc::new(config),
    };
    let json = vec![(header::CONTENT_TYPE, "application/json")];

    let resp = oneshot_raw(state.clone(), "POST", "/contacts", json.clone(), NEW_CONTACT).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(header_str(&resp, header::LOCATION).ends_with(&format!("/contacts/{}", u64::MAX)));

    let resp = oneshot_raw(state.clone(), "POST", "/contacts", json, NEW_CONTACT).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.store.len(), 1);
  }

  // ── Store contract ──────────────────────────────────────────────────────────

  /// A store whose conditional writes answer `Taken`, which no conforming
  /// store does.
  #[derive(Clone, Default)]
  struct TakenStore(MemoryStore);

  impl ContactStore for TakenStore {
    type Error = roster_store_memory::Error;

    fn find(
      &self,
      id: ContactId,
    ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_ {
      self.0.find(id)
    }

    fn find_all(
      &self,
    ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_ {
      self.0.find_all()
    }

    fn find_by_title<'a>(
      &'a self,
      needle: &'a str,
    ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a {
      self.0.find_by_title(needle)
    }

    fn save(
      &self,
      contact: Contact,
    ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_ {
      self.0.save(contact)
    }

    fn create(
      &self,
      contact: Contact,
    ) -> impl Future<Output = Result<WriteOutcome<Contact>, Self::Error>> + Send + '_ {
      self.0.create(contact)
    }

    fn update_if<'a>(
      &'a self,
      _contact: Contact,
      _precondition: &'a Precondition,
    ) -> impl Future<Output = Result<WriteOutcome<Contact>, Self::Error>> + Send + 'a {
      async { Ok(WriteOutcome::Taken) }
    }

    fn delete_if<'a>(
      &'a self,
      _id: ContactId,
      _precondition: &'a Precondition,
    ) -> impl Future<Output = Result<WriteOutcome<Contact>, Self::Error>> + Send + 'a {
      async { Ok(WriteOutcome::Taken) }
    }
  }

  #[tokio::test]
  async fn taken_from_conditional_writes_is_a_server_error() {
    let state = AppState {
      store:  Arc::new(TakenStore::default()),
      config: Arc::new(ServerConfig::default()),
    };
    let resp = oneshot_raw(
      state.clone(),
      "PUT",
      "/contacts/1001",
      vec![(header::CONTENT_TYPE, "application/json")],
      NEW_CONTACT,
    ).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = oneshot_raw(state, "DELETE", "/contacts/1001", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  // ── Config ──────────────────────────────────────────────────────────────────

  #[test]
  fn base_url_falls_back_to_host_and_port() {
    let config = ServerConfig { port: 9000, ..ServerConfig::default() };
    assert_eq!(config.base_url(), "http://127.0.0.1:9000");

    let config = ServerConfig {
      public_url: Some("https://contacts.example.com/".to_string()),
      ..ServerConfig::default()
    };
    assert_eq!(config.base_url(), "https://contacts.example.com");
  }
}
