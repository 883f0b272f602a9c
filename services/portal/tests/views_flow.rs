use chrono::Utc;
use std::sync::Arc;

use api::gateway::SharedGateway;
use api::models::news::{NewsId, NewsItem, SourceLabel};
use api::models::preferences::{AuthorPreferences, SourcePreferences};
use api::preferences::{PreferenceState, SaveFailure};
use api::testing::{StubGateway, stub_failure};
use api::FilterCriteria;
use auth::{LoginForm, RegistrationForm, View};
use common::session::{MemorySessionStore, SessionStore, SharedSessionStore};
use portal::PortalState;
use portal::views::{
    self, Entry, LoginView, NEWS_FETCH_FAILED, NO_MATCHING_NEWS, NewsView,
    PREFERENCES_LOAD_FAILED, PREFERENCES_SAVE_FAILED, PreferencesView, RegisterView,
};

fn news(id: i64, title: &str, source: &str, published_at: &str) -> NewsItem {
    NewsItem {
        id: NewsId::Number(id),
        title: Some(title.to_string()),
        url: Some(format!("https://{}/{}", source, id)),
        image: None,
        source: Some(source.to_string()),
        published_at: Some(published_at.to_string()),
    }
}

fn portal(store: MemorySessionStore, gateway: Arc<StubGateway>) -> PortalState {
    let store: SharedSessionStore = Arc::new(store);
    let gateway: SharedGateway = gateway;
    PortalState::new(store, gateway)
}

#[tokio::test]
async fn test_news_view_without_session_redirects_without_fetching() {
    let gateway = Arc::new(StubGateway::new());
    let state = portal(MemorySessionStore::new(), gateway.clone());

    let entry = NewsView::enter(&state).await;
    assert_eq!(entry.redirect(), Some(View::Login));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_news_view_fetch_failure_shows_banner() {
    let gateway = Arc::new(StubGateway::new().with_news(Err(stub_failure("list_news"))));
    let state = portal(MemorySessionStore::with_token("tok"), gateway);

    let view = NewsView::enter(&state).await.entered().unwrap();
    assert_eq!(view.banner(), Some(NEWS_FETCH_FAILED));
    assert!(view.items().is_empty());

    let rendered = view.render_in(&Utc);
    assert!(rendered.contains(NEWS_FETCH_FAILED));
    assert!(rendered.contains(NO_MATCHING_NEWS));
}

#[tokio::test]
async fn test_news_view_filters_and_renders() {
    let items = vec![
        news(1, "Storm hits coast", "nytimes.com", "2024-03-15T10:00:00Z"),
        news(2, "Election results", "guardianapis.com", "2024-03-15T12:30:00Z"),
        news(3, "Storm season ends", "guardianapis.com", "2024-03-16T08:00:00Z"),
    ];
    let gateway = Arc::new(StubGateway::new().with_news(Ok(items.clone())));
    let state = portal(MemorySessionStore::with_token("tok"), gateway);

    let mut view = NewsView::enter(&state).await.entered().unwrap();
    assert_eq!(view.items().len(), 3);
    assert_eq!(view.visible().len(), 3);
    assert_eq!(view.visible_in(&Utc).len(), 3);

    view.set_criteria(
        FilterCriteria::new()
            .with_search("STORM")
            .with_source(SourceLabel::TheGuardian),
    );
    assert_eq!(view.visible_in(&Utc), vec![items[2].clone()]);

    let rendered = view.render_in(&Utc);
    assert!(rendered.contains("Storm season ends"));
    assert!(rendered.contains("16 Mar 2024 08:00"));
    assert!(!rendered.contains("Storm hits coast"));

    view.set_criteria(FilterCriteria::new().with_date("2024-01-01"));
    assert!(view.render_in(&Utc).contains(NO_MATCHING_NEWS));
    // Filtering never touches the fetched collection
    assert_eq!(view.items().len(), 3);
}

#[tokio::test]
async fn test_news_view_renders_undated_item() {
    let mut undated = news(4, "Undated report", "newsapi.org", "");
    undated.published_at = None;
    undated.url = None;
    let items = vec![
        news(1, "Storm hits coast", "nytimes.com", "2024-03-15T10:00:00Z"),
        undated,
    ];
    let gateway = Arc::new(StubGateway::new().with_news(Ok(items)));
    let state = portal(MemorySessionStore::with_token("tok"), gateway);

    let mut view = NewsView::enter(&state).await.entered().unwrap();
    assert_eq!(view.banner(), None);

    let rendered = view.render_in(&Utc);
    assert!(rendered.contains("Undated report"));
    assert!(rendered.contains("  Published at: -"));

    // Only a set date filter drops the undated item
    view.set_criteria(FilterCriteria::new().with_date("2024-03-15"));
    let visible = view.visible_in(&Utc);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title_or_empty(), "Storm hits coast");
}

#[tokio::test]
async fn test_login_view_stores_session() {
    let gateway = Arc::new(StubGateway::new());
    let state = portal(MemorySessionStore::new(), gateway.clone());

    let mut view = LoginView::enter(&state).entered().unwrap();
    let next = view
        .submit(&LoginForm::new("ada@example.com", "secret"))
        .await
        .unwrap();
    assert_eq!(next, View::News);
    assert_eq!(view.error(), None);
    assert_eq!(gateway.calls(), vec!["login"]);

    // Signed in now, so the entry views send the visitor to news
    assert_eq!(LoginView::enter(&state).redirect(), Some(View::News));
    assert_eq!(RegisterView::enter(&state).redirect(), Some(View::News));
}

#[tokio::test]
async fn test_login_view_keeps_failure_message() {
    let gateway = Arc::new(StubGateway::new().with_login(Err(stub_failure("login"))));
    let state = portal(MemorySessionStore::new(), gateway.clone());

    let mut view = LoginView::enter(&state).entered().unwrap();
    assert!(view.submit(&LoginForm::new("", "")).await.is_err());
    assert_eq!(view.error(), Some("Email and password are required."));
    assert!(gateway.calls().is_empty());

    assert!(
        view.submit(&LoginForm::new("ada@example.com", "wrong"))
            .await
            .is_err()
    );
    assert_eq!(
        view.error(),
        Some("Login failed. Please check your credentials and try again.")
    );
    assert!(state.store.get().unwrap().is_none());
}

#[tokio::test]
async fn test_register_view_signs_in() {
    let gateway = Arc::new(StubGateway::new());
    let state = portal(MemorySessionStore::new(), gateway.clone());

    let mut view = match RegisterView::enter(&state) {
        Entry::Entered(view) => view,
        Entry::Redirected(to) => panic!("unexpected redirect to {}", to),
    };
    let next = view
        .submit(&RegistrationForm::new("Ada", "ada@example.com", "secret"))
        .await
        .unwrap();
    assert_eq!(next, View::News);
    assert_eq!(gateway.calls(), vec!["register"]);
    assert!(state.store.get().unwrap().is_some());
}

#[tokio::test]
async fn test_logout_returns_to_login() {
    let gateway = Arc::new(StubGateway::new());
    let state = portal(MemorySessionStore::with_token("tok"), gateway);

    assert_eq!(views::logout(&state).unwrap(), View::Login);
    assert_eq!(NewsView::enter(&state).await.redirect(), Some(View::Login));
}

#[tokio::test]
async fn test_preferences_load_failure_shows_banner() {
    let gateway = Arc::new(
        StubGateway::new()
            .with_authors(["Ada"])
            .with_author_prefs(Err(stub_failure("get_author_prefs"))),
    );
    let state = portal(MemorySessionStore::with_token("tok"), gateway);

    let view = PreferencesView::enter(&state).await.entered().unwrap();
    assert!(matches!(view.state(), PreferenceState::Error(_)));
    assert_eq!(view.banner(), Some(PREFERENCES_LOAD_FAILED));
    assert!(view.draft().is_none());
}

#[tokio::test]
async fn test_preferences_partial_save_keeps_edits() {
    let gateway = Arc::new(
        StubGateway::new()
            .with_authors(["Ada", "Grace"])
            .with_source_prefs(Ok(SourcePreferences {
                default_sources: vec!["The Guardian".to_string()],
            }))
            .with_author_prefs(Ok(AuthorPreferences::default())),
    );
    let state = portal(MemorySessionStore::with_token("tok"), gateway.clone());

    let mut view = PreferencesView::enter(&state).await.entered().unwrap();
    let draft = view.draft_mut().unwrap();
    draft.select_source(SourceLabel::NewYorkTimes);
    draft.select_author("Grace").unwrap();

    gateway.set_author_outcome(Err(stub_failure("set_author_prefs")));
    assert_eq!(view.save().await, Err(SaveFailure::Authors));
    assert_eq!(view.banner(), Some(PREFERENCES_SAVE_FAILED));

    let draft = view.draft().unwrap();
    assert!(draft.is_source_selected(SourceLabel::NewYorkTimes));
    assert_eq!(draft.default_authors(), ["Grace".to_string()]);
    assert_eq!(draft.save_error(), Some(SaveFailure::Authors));

    gateway.set_author_outcome(Ok(()));
    assert_eq!(view.save().await, Ok(View::News));
    assert_eq!(view.banner(), None);
    assert!(matches!(view.state(), PreferenceState::Saved));
    assert_eq!(
        gateway.saved_authors().last(),
        Some(&AuthorPreferences {
            default_authors: vec!["Grace".to_string()],
        })
    );
}

#[tokio::test]
async fn test_preferences_render_marks_selection() {
    let gateway = Arc::new(
        StubGateway::new()
            .with_authors(["Ada", "Grace"])
            .with_source_prefs(Ok(SourcePreferences {
                default_sources: vec!["The Guardian".to_string()],
            }))
            .with_author_prefs(Ok(AuthorPreferences {
                default_authors: vec!["Ada".to_string()],
            })),
    );
    let state = portal(MemorySessionStore::with_token("tok"), gateway);

    let view = PreferencesView::enter(&state).await.entered().unwrap();
    let rendered = view.render();
    assert!(rendered.contains("[x] The Guardian"));
    assert!(rendered.contains("[ ] New York Times"));
    assert!(rendered.contains("[x] Ada"));
    assert!(rendered.contains("[ ] Grace"));
}
