use std::sync::Once;

use proffix_rest::client::{ClientConfig, Credentials, Options};
use proffix_rest::ProffixRestClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LOGIN_PATH: &str = "/pxapi/v4/PRO/Login";
pub const SESSION_TOKEN: &str = "b7e2c7f1-5a1d-4c55-9a7e-0c2f5d9e1a11";

static TRACING: Once = Once::new();

/// Install a test subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A mock PROFFIX server with working login and logout.
pub struct MockProffix {
    pub server: MockServer,
}

impl MockProffix {
    pub async fn start() -> Self {
        init_tracing();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(201).insert_header("PxSessionId", SESSION_TOKEN))
            .named("login")
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(204))
            .named("logout")
            .mount(&server)
            .await;

        Self { server }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.uri(), credentials())
    }

    pub fn client(&self) -> ProffixRestClient {
        self.client_with(Options::default())
    }

    pub fn client_with(&self, options: Options) -> ProffixRestClient {
        ProffixRestClient::new(self.config().with_options(options))
            .expect("client construction should not fail")
    }

    /// Number of received requests with the given method and path.
    pub async fn count(&self, http_method: &str, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .count()
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("Gast", "gast123", "DEMODB").with_modules(["ADR", "PRO", "STU"])
}

/// Configuration of a real server for the ignored live tests.
///
/// Panics with a hint when `PX_URL` is not set.
pub fn live_config() -> ClientConfig {
    let url = match std::env::var("PX_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => panic!(
            "PX_URL is not set. Live tests need a reachable PROFFIX REST-API, e.g.\n\
             PX_URL=https://myserver:11011 PX_USER=Gast PX_PASSWORD=... PX_DATABASE=DEMODB \\\n\
             cargo test --test integration -- --ignored"
        ),
    };

    let var = |name: &str| std::env::var(name).unwrap_or_default();
    let creds = Credentials::new(var("PX_USER"), var("PX_PASSWORD"), var("PX_DATABASE"))
        .with_modules(["ADR"]);

    let mut options = Options::builder().with_verify_ssl(var("PX_VERIFY_SSL") != "false");
    if let Ok(key) = std::env::var("PX_API_KEY") {
        options = options.with_api_key(key);
    }

    ClientConfig::new(url, creds).with_options(options.build())
}
