//! End-to-end tests for the upload and download flows against a mocked
//! OneSky API.

use onesky_sync::auth::Credentials;
use onesky_sync::config::{Config, Locale, Project};
use onesky_sync::error::SyncError;
use onesky_sync::extract::StringExtractor;
use onesky_sync::paths::{bundle_dir, resource_path};
use onesky_sync::sync::{download_all, upload_all, Confirm, Item, Outcome, Reporter, SyncContext};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

// ==================== Test Helpers ====================

const STRINGS: &str = "/* Greeting */\n\"hello\" = \"Hello\";\n";

/// Writes a canned table where genstrings would.
struct FakeExtractor;

impl StringExtractor for FakeExtractor {
    fn extract(&self, root: &Path) -> Result<PathBuf, SyncError> {
        let out = root.join("Localizable.strings");
        std::fs::write(&out, STRINGS)?;
        Ok(out)
    }
}

struct AlwaysYes {
    asked: usize,
}

impl Confirm for AlwaysYes {
    fn confirm(&mut self, _prompt: &str) -> anyhow::Result<bool> {
        self.asked += 1;
        Ok(true)
    }
}

#[derive(Default)]
struct Recorder {
    begun: Vec<Item>,
    lines: Vec<(Item, bool, String)>,
}

impl Reporter for Recorder {
    fn begin(&mut self, item: &Item) {
        self.begun.push(item.clone());
    }

    fn finish(&mut self, outcome: &Outcome) {
        let message = match &outcome.result {
            Ok(()) => String::new(),
            Err(e) => e.to_string(),
        };
        self.lines
            .push((outcome.item.clone(), outcome.is_success(), message));
    }
}

fn locale(s: &str) -> Locale {
    Locale::parse(s).unwrap()
}

fn config(api_url: &str, projects: Vec<Project>) -> Config {
    Config {
        api_url: api_url.to_string(),
        canonical_file: "TinkLinkUI.strings".to_string(),
        projects,
        ..Config::default()
    }
}

// reqwest's blocking client must not run on an async worker thread.
async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

// ==================== Upload Flow ====================

#[tokio::test(flavor = "multi_thread")]
async fn upload_continues_after_a_project_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/projects/100/files"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/projects/200/files"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"meta":{"status":400,"message":"Invalid file"}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let root_path = root.path().to_path_buf();
    let cfg = config(
        &server.uri(),
        vec![
            Project { name: "A".into(), project_id: "100".into(), locales: vec![] },
            Project { name: "B".into(), project_id: "200".into(), locales: vec![] },
        ],
    );

    let (report, recorder, asked) = blocking(move || {
        let ctx = SyncContext::new(cfg, Credentials::new("key", "secret"), root_path).unwrap();
        let mut confirm = AlwaysYes { asked: 0 };
        let mut recorder = Recorder::default();
        let report = upload_all(&ctx, &FakeExtractor, &mut confirm, &mut recorder).unwrap();
        (report, recorder, confirm.asked)
    })
    .await;

    assert_eq!(asked, 1);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failures(), 1);
    assert_eq!(recorder.begun.len(), 2);

    let (first, first_ok, _) = &recorder.lines[0];
    assert_eq!(
        first,
        &Item::Upload { project: "A".into(), file: "TinkLinkUI.strings".into() }
    );
    assert!(first_ok);

    let (_, second_ok, message) = &recorder.lines[1];
    assert!(!second_ok);
    assert_eq!(message, r#"{"meta":{"status":400,"message":"Invalid file"}}"#);

    // Both projects received the same table under the canonical name.
    for req in server.received_requests().await.unwrap() {
        let body = String::from_utf8_lossy(&req.body);
        assert!(body.contains("filename=\"TinkLinkUI.strings\""));
        assert!(body.contains(STRINGS));
    }

    // The canonical file and the extractor output are gone.
    assert!(!root.path().join("TinkLinkUI.strings").exists());
    assert!(!root.path().join("Localizable.strings").exists());
}

// ==================== Download Flow ====================

#[tokio::test(flavor = "multi_thread")]
async fn download_reports_each_locale_and_falls_back_to_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/projects/170340/translations"))
        .and(query_param("locale", "en-US"))
        .and(query_param("source_file_name", "TinkLinkUI.strings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"hello\" = \"Hello\";\n"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/projects/170340/translations"))
        .and(query_param("locale", "sv-SE"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    // Only the language-only directory for English exists.
    std::fs::create_dir_all(bundle_dir(root.path(), "TinkLinkUI", "en")).unwrap();
    std::fs::create_dir_all(bundle_dir(root.path(), "TinkLinkUI", "sv-SE")).unwrap();
    let sv_file = resource_path(root.path(), "TinkLinkUI", "sv-SE", "TinkLinkUI.strings");
    std::fs::write(&sv_file, "\"hello\" = \"Hej\";\n").unwrap();

    let root_path = root.path().to_path_buf();
    let cfg = config(
        &server.uri(),
        vec![Project {
            name: "TinkLinkUI".into(),
            project_id: "170340".into(),
            locales: vec![locale("sv-SE"), locale("en-US")],
        }],
    );

    let (report, recorder) = blocking(move || {
        let ctx = SyncContext::new(cfg, Credentials::new("key", "secret"), root_path).unwrap();
        let mut recorder = Recorder::default();
        let report = download_all(&ctx, &mut recorder);
        (report, recorder)
    })
    .await;

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.failures(), 1);

    // sv-SE failed first, en-US was still attempted.
    let (sv, sv_ok, sv_message) = &recorder.lines[0];
    assert!(!sv_ok);
    assert_eq!(sv_message, "Internal error");
    assert!(matches!(sv, Item::Download { locale, .. } if locale.as_str() == "sv-SE"));
    assert_eq!(
        std::fs::read_to_string(&sv_file).unwrap(),
        "\"hello\" = \"Hej\";\n"
    );

    let (en, en_ok, _) = &recorder.lines[1];
    assert!(en_ok);
    let expected = resource_path(root.path(), "TinkLinkUI", "en", "TinkLinkUI.strings");
    assert_eq!(
        en,
        &Item::Download {
            project: "TinkLinkUI".into(),
            locale: locale("en-US"),
            destination: Some(expected.clone()),
        }
    );
    assert_eq!(std::fs::read_to_string(expected).unwrap(), "\"hello\" = \"Hello\";\n");
    assert!(!bundle_dir(root.path(), "TinkLinkUI", "en-US").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn download_skips_network_when_no_bundle_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let root_path = root.path().to_path_buf();
    let cfg = config(
        &server.uri(),
        vec![Project {
            name: "TinkLinkUI".into(),
            project_id: "170340".into(),
            locales: vec![locale("de-DE")],
        }],
    );

    let report = blocking(move || {
        let ctx = SyncContext::new(cfg, Credentials::new("key", "secret"), root_path).unwrap();
        download_all(&ctx, &mut Recorder::default())
    })
    .await;

    assert_eq!(report.failures(), 1);
    let message = report.outcomes[0].result.as_ref().unwrap_err().to_string();
    assert!(message.contains("de-DE"), "{message}");
}
