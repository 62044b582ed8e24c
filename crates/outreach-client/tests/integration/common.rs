use outreach_core::models::Contact;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-secret-key";

/// A company page with enough paragraph text to survive the thin-content check.
pub fn company_page() -> String {
    let paragraphs: String = (0..6)
        .map(|i| {
            format!(
                "<p>Point {i}: Compilers Inc builds optimizing compilers, language servers, and debuggers for embedded teams.</p>"
            )
        })
        .collect();
    format!(
        "<html><head><title>Compilers Inc</title><script>track()</script></head>\
         <body><nav><a href=\"/\">Home</a></nav><article><h1>About Compilers Inc</h1>{paragraphs}\
         <p>We are hiring, see <a href=\"/careers\">careers</a>.</p></article>\
         <footer>Copyright</footer></body></html>"
    )
}

/// Serves `body` as HTML at `route` and returns the full URL.
pub async fn serve_html(server: &MockServer, route: &str, status: u16, body: &str) -> String {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
    format!("{}{route}", server.uri())
}

pub fn contact(url: &str) -> Contact {
    Contact {
        email: "grace@compilers.example".into(),
        name: "Grace Hopper".into(),
        company: "Compilers Inc".into(),
        role: "Engineering Manager".into(),
        url: url.into(),
    }
}

/// Base URL of a local port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
