use actix_web::{App, HttpResponse, HttpServer, web};

const INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Test site home page with a decent title</title>
  <meta name="description" content="Home page of the crawler test site.">
  <link rel="canonical" href="/">
  <script type="application/ld+json">{"@context": "https://schema.org", "@type": "WebSite"}</script>
</head>
<body>
  <h1>Welcome</h1>
  <h2>Sections</h2>
  <p>Some introductory text for the crawler test site.</p>
  <img src="/logo.png" alt="Logo" title="Logo">
  <img src="/banner.png" alt="">
  <img src="/photo.png">
  <a href="/about">About us</a>
  <a href="/contact#form">Contact</a>
  <a href="/logo.png"></a>
  <a href="https://external.example.org/" rel="nofollow noopener">Partner</a>
  <script>var ignored = "these words are not counted";</script>
</body>
</html>"#;

const ABOUT: &str = r#"<!DOCTYPE html>
<html>
<head><title>About</title></head>
<body>
  <h1>About</h1>
  <h1>Second heading</h1>
  <div itemscope itemtype="https://schema.org/Organization">Team</div>
  <a href="/">Home</a>
</body>
</html>"#;

const CONTACT: &str = r#"<!DOCTYPE html>
<html lang="it">
<head><title>Contact</title></head>
<body><p>Write to us.</p><a href="/missing">Broken</a></body>
</html>"#;

fn html(body: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

pub async fn get_test_server_url() -> String {
    let http_server = HttpServer::new(|| {
        App::new()
            .route("/", web::get().to(|| async { html(INDEX) }))
            .route("/about", web::get().to(|| async { html(ABOUT) }))
            .route("/contact", web::get().to(|| async { html(CONTACT) }))
            .route(
                "/logo.png",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("image/png")
                        .body(vec![0u8; 16])
                }),
            )
            .route(
                "/missing",
                web::get().to(|| async {
                    HttpResponse::NotFound()
                        .content_type("text/html")
                        .body("<html><head><title>Not found</title></head><body></body></html>")
                }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    url
}
