use mongodb::bson::oid::ObjectId;
use reqwest::{Client, StatusCode, header, redirect};
use std::sync::Arc;
use tokio::net::TcpListener;
use vocab_portal::{
    AppConfig, AppState, InMemoryRepository, create_router,
    models::{NewCategory, WordFields},
    repository::{Repository, RepositoryState},
};

pub struct TestApp {
    pub address: String,
    pub repo: Arc<InMemoryRepository>,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

async fn spawn_app() -> TestApp {
    let repo = Arc::new(InMemoryRepository::new());
    let state = AppState {
        repo: repo.clone() as RepositoryState,
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, repo }
}

/// A browser-like client that keeps cookies but does not follow redirects,
/// so every redirect can be asserted.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .unwrap()
}

fn location(response: &reqwest::Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn register(app: &TestApp, client: &Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(app.url("/register"))
        .form(&[("name", "Aino"), ("email", email), ("password", password)])
        .send()
        .await
        .expect("register request failed")
}

async fn logged_in_client(app: &TestApp) -> Client {
    let client = client();
    let response = register(app, &client, "aino@example.com", "salasana").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    client
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let response = client().get(app.url("/health")).send().await.unwrap();
    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_protected_routes_redirect_anonymous_to_login() {
    let app = spawn_app().await;
    let client = client();

    for path in ["/", "/add", "/categories", "/statistics", "/users"] {
        let response = client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert!(location(&response).starts_with("/login?next="), "{path}");
    }

    // The guard runs before the operation: nothing is deleted anonymously.
    let id = app.repo.insert_word(WordFields::default()).await.unwrap();
    let response = client
        .get(app.url(&format!("/delete/{}", id.to_hex())))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.repo.list_words().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_logs_in_and_opens_vocabulary() {
    let app = spawn_app().await;
    let client = client();

    let response = register(&app, &client, "aino@example.com", "salasana").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let page = client.get(app.url("/")).send().await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains("Logged in as Aino"));
}

#[tokio::test]
async fn test_duplicate_registration_is_plain_text_and_creates_nothing() {
    let app = spawn_app().await;
    let client = client();
    register(&app, &client, "aino@example.com", "salasana").await;

    let second = register(&app, &client, "aino@example.com", "toinen").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert!(second.headers().get(header::LOCATION).is_none());
    assert_eq!(second.text().await.unwrap(), "User already exists");

    assert_eq!(app.repo.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_logout_cycle() {
    let app = spawn_app().await;
    register(&app, &client(), "aino@example.com", "salasana").await;

    let client = client();
    let wrong = client
        .post(app.url("/login"))
        .form(&[("email", "aino@example.com"), ("password", "väärä")])
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.text().await.unwrap(), "Invalid credentials");
    let still_anonymous = client.get(app.url("/")).send().await.unwrap();
    assert_eq!(still_anonymous.status(), StatusCode::SEE_OTHER);

    let right = client
        .post(app.url("/login"))
        .form(&[("email", "aino@example.com"), ("password", "salasana")])
        .send()
        .await
        .unwrap();
    assert_eq!(right.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&right), "/");
    let protected = client.get(app.url("/")).send().await.unwrap();
    assert_eq!(protected.status(), StatusCode::OK);

    let logout = client.get(app.url("/logout")).send().await.unwrap();
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);
    let after = client.get(app.url("/")).send().await.unwrap();
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_returns_to_requested_page() {
    let app = spawn_app().await;
    register(&app, &client(), "aino@example.com", "salasana").await;
    let client = client();

    let form = client
        .get(app.url("/login?next=%2Fstatistics"))
        .send()
        .await
        .unwrap();
    assert!(form.text().await.unwrap().contains("value=\"/statistics\""));

    let response = client
        .post(app.url("/login"))
        .form(&[
            ("email", "aino@example.com"),
            ("password", "salasana"),
            ("next", "/statistics"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/statistics");
}

#[tokio::test]
async fn test_login_ignores_off_site_next() {
    let app = spawn_app().await;
    register(&app, &client(), "aino@example.com", "salasana").await;

    for next in ["//evil.example", "/\\evil.example", "https://evil.example"] {
        let response = client()
            .post(app.url("/login"))
            .form(&[
                ("email", "aino@example.com"),
                ("password", "salasana"),
                ("next", next),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(location(&response), "/", "next={next}");
    }
}

#[tokio::test]
async fn test_add_word_splits_and_trims_lists() {
    let app = spawn_app().await;
    let client = logged_in_client(&app).await;

    let response = client
        .post(app.url("/add"))
        .form(&[
            ("word", "talo"),
            ("translation", "house"),
            ("partOfSpeech", "noun"),
            ("examples", "a, b ,,c"),
            ("categories", "home, ,buildings"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let words = app.repo.list_words().await.unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].word, "talo");
    assert_eq!(words[0].examples, vec!["a", "b", "c"]);
    assert_eq!(words[0].categories, vec!["home", "buildings"]);

    let page = client.get(app.url("/")).send().await.unwrap().text().await.unwrap();
    assert!(page.contains("talo"));
    assert!(page.contains(&format!("/edit/{}", words[0].id.to_hex())));
}

#[tokio::test]
async fn test_add_word_without_word_field_is_rejected() {
    let app = spawn_app().await;
    let client = logged_in_client(&app).await;

    let response = client
        .post(app.url("/add"))
        .form(&[("translation", "house")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
    assert!(app.repo.list_words().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_replaces_all_fields() {
    let app = spawn_app().await;
    let client = logged_in_client(&app).await;
    let id = app
        .repo
        .insert_word(WordFields {
            word: "talo".to_string(),
            translation: "house".to_string(),
            part_of_speech: "noun".to_string(),
            examples: vec!["iso talo".to_string()],
            categories: vec!["home".to_string()],
        })
        .await
        .unwrap();

    let form = client
        .get(app.url(&format!("/edit/{}", id.to_hex())))
        .send()
        .await
        .unwrap();
    assert_eq!(form.status(), StatusCode::OK);
    assert!(form.text().await.unwrap().contains("value=\"iso talo\""));

    let response = client
        .post(app.url(&format!("/edit/{}", id.to_hex())))
        .form(&[("word", "koti"), ("translation", "home")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let entry = app.repo.get_word(id).await.unwrap().unwrap();
    assert_eq!(entry.word, "koti");
    assert_eq!(entry.translation.as_deref(), Some("home"));
    assert_eq!(entry.part_of_speech.as_deref(), Some(""));
    assert!(entry.examples.is_empty());
    assert!(entry.categories.is_empty());
}

#[tokio::test]
async fn test_edit_form_for_unknown_or_malformed_id() {
    let app = spawn_app().await;
    let client = logged_in_client(&app).await;

    let missing = client
        .get(app.url(&format!("/edit/{}", ObjectId::new().to_hex())))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let malformed = client.get(app.url("/edit/not-an-id")).send().await.unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_word_and_missing_id_noop() {
    let app = spawn_app().await;
    let client = logged_in_client(&app).await;
    let keep = app.repo.insert_word(WordFields::default()).await.unwrap();
    let gone = app.repo.insert_word(WordFields::default()).await.unwrap();

    let response = client
        .get(app.url(&format!("/delete/{}", gone.to_hex())))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = client
        .get(app.url(&format!("/delete/{}", ObjectId::new().to_hex())))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let remaining = app.repo.list_words().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep);

    let malformed = client.get(app.url("/delete/xyz")).send().await.unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_statistics_match_collection_sizes() {
    let app = spawn_app().await;
    let client = logged_in_client(&app).await;
    for _ in 0..3 {
        app.repo.insert_word(WordFields::default()).await.unwrap();
    }
    for name in ["animals", "food"] {
        app.repo
            .insert_category(NewCategory {
                name: name.to_string(),
                description: format!("{name} words"),
            })
            .await;
    }

    let page = client
        .get(app.url("/statistics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Total words: 3"));
    assert!(page.contains("Total categories: 2"));
    assert!(page.contains("Total users: 1"));
}

#[tokio::test]
async fn test_categories_and_users_listings() {
    let app = spawn_app().await;
    let client = logged_in_client(&app).await;
    app.repo
        .insert_category(NewCategory {
            name: "animals".to_string(),
            description: "Eläimet".to_string(),
        })
        .await;

    let categories = client
        .get(app.url("/categories"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(categories.contains("animals - Eläimet"));

    let users = client
        .get(app.url("/users"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(users.contains("aino@example.com"));
    assert!(!users.contains("$argon2"));
}
