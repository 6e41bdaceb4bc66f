use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request, StatusCode};
use routekit_demo::{Stuff, demo_router};
use routekit_web::handler_fn;
use routekit_web::router::filter::path_end;
use routekit_web::router::{Router, get};
use routekit_web::{RequestContext, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn request(method: Method, uri: &str) -> RequestContext {
    Request::builder().method(method).uri(uri).body(Bytes::new()).unwrap().into()
}

async fn send(router: &Router, req: RequestContext) -> (StatusCode, String) {
    let response = router.respond(req).await;
    (response.status(), String::from_utf8(response.into_body().to_vec()).unwrap())
}

async fn get_text(router: &Router, uri: &str) -> (StatusCode, String) {
    send(router, request(Method::GET, uri)).await
}

#[tokio::test]
async fn first_matching_rule_wins() {
    async fn general() -> &'static str {
        "general"
    }
    async fn specific() -> &'static str {
        "specific"
    }

    let general_first = Router::builder()
        .route("/stuff", get(handler_fn(general)))
        .route("/stuff", get(handler_fn(specific)).with(path_end()))
        .build();
    assert_eq!(get_text(&general_first, "/stuff").await.1, "general");

    let specific_first = Router::builder()
        .route("/stuff", get(handler_fn(specific)).with(path_end()))
        .route("/stuff", get(handler_fn(general)))
        .build();
    assert_eq!(get_text(&specific_first, "/stuff").await.1, "specific");
}

#[tokio::test]
async fn get_stuff_is_json() {
    let router = demo_router(true);

    let response = router.respond(request(Method::GET, "/stuff")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "application/json");

    let stuff: Stuff = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(stuff, Stuff::new(42, "stuff"));
}

#[tokio::test]
async fn post_stuff_echoes_transformed_entity() {
    let router = demo_router(true);
    let req: RequestContext = Request::builder()
        .method(Method::POST)
        .uri("/stuff")
        .header(CONTENT_TYPE, "application/json")
        .body(Bytes::from(r#"{"id":1,"data":"my stuff"}"#))
        .unwrap()
        .into();

    let response = router.respond(req).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "application/json");

    let stuff: Stuff = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(stuff, Stuff::new(101, "my stuff posted"));
}

#[tokio::test]
async fn post_stuff_with_bad_body() {
    let router = demo_router(false);
    let req: RequestContext =
        Request::builder().method(Method::POST).uri("/stuff").body(Bytes::from(r#"{"id":1}"#)).unwrap().into();

    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("malformed request body: "), "body: {body}");
}

#[tokio::test]
async fn params_with_and_without_optional() {
    let router = demo_router(true);

    assert_eq!(get_text(&router, "/params?req=hi&opt=bye").await, (StatusCode::OK, "Req: hi, Opt: Some(bye)".into()));
    assert_eq!(get_text(&router, "/params?req=hi").await, (StatusCode::OK, "Req: hi, Opt: None".into()));
    assert_eq!(get_text(&router, "/params?req=hi%20there").await.1, "Req: hi there, Opt: None");
}

#[tokio::test]
async fn params_missing_required_depends_on_fallback() {
    let (status, body) = get_text(&demo_router(false), "/params").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "missing required query parameter 'req'");

    assert_eq!(get_text(&demo_router(true), "/params").await, (StatusCode::OK, "Hello world".into()));
}

#[tokio::test]
async fn nested_junk_routes() {
    let router = demo_router(false);

    assert_eq!(get_text(&router, "/junk/mine").await.1, "MINE!");
    assert_eq!(get_text(&router, "/junk/yours").await.1, "YOURS!");
    assert_eq!(get_text(&router, "/junk/other").await.0, StatusCode::NOT_FOUND);

    assert_eq!(get_text(&demo_router(true), "/junk/other").await.1, "Hello world");
}

#[tokio::test]
async fn trailing_segments_do_not_match() {
    let router = demo_router(false);

    assert_eq!(get_text(&router, "/params/extra?req=hi").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get_text(&router, "/junk/mine/extra").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get_text(&router, "/later/extra").await.0, StatusCode::NOT_FOUND);

    assert_eq!(get_text(&demo_router(true), "/params/extra?req=hi").await.1, "Hello world");
}

#[tokio::test]
async fn headers_route() {
    let router = demo_router(false);
    let req: RequestContext =
        Request::builder().uri("/headers").header("ct-remote-user", "alice").body(Bytes::new()).unwrap().into();

    assert_eq!(send(&router, req).await, (StatusCode::OK, "alice".into()));

    let (status, body) = get_text(&router, "/headers").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "missing required header 'ct-remote-user'");

    assert_eq!(get_text(&demo_router(true), "/headers").await.1, "Hello world");
}

#[tokio::test]
async fn later_completes_asynchronously() {
    assert_eq!(get_text(&demo_router(false), "/later").await, (StatusCode::OK, "completed later".into()));
}

#[tokio::test]
async fn unknown_method_or_path() {
    let router = demo_router(false);

    assert_eq!(send(&router, request(Method::DELETE, "/stuff")).await.0, StatusCode::NOT_FOUND);
    assert_eq!(get_text(&router, "/").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get_text(&demo_router(true), "/").await.1, "Hello world");
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let router = std::sync::Arc::new(demo_router(true));

    let tasks: Vec<_> = ["/junk/mine", "/later", "/params?req=a", "/junk/yours"]
        .into_iter()
        .map(|uri| {
            let router = std::sync::Arc::clone(&router);
            tokio::spawn(async move { get_text(&router, uri).await.1 })
        })
        .collect();

    let mut bodies = vec![];
    for task in tasks {
        bodies.push(task.await.unwrap());
    }
    assert_eq!(bodies, ["MINE!", "completed later", "Req: a, Opt: None", "YOURS!"]);
}

#[tokio::test]
async fn serve_demo_over_tcp() {
    let tcp_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = tcp_listener.local_addr().unwrap();
    let server = Server::builder().router(demo_router(true)).bind(address.to_string()).build().unwrap();
    let task = tokio::spawn(server.serve(tcp_listener));

    let raw_request = concat!(
        "POST /stuff HTTP/1.1\r\n",
        "Host: localhost\r\n",
        "Content-Type: application/json\r\n",
        "Content-Length: 26\r\n",
        "\r\n",
        r#"{"id":1,"data":"my stuff"}"#,
        "GET /junk/mine HTTP/1.1\r\n",
        "Connection: close\r\n",
        "\r\n",
    );

    let mut stream = TcpStream::connect(address).await.unwrap();
    stream.write_all(raw_request.as_bytes()).await.unwrap();
    let mut received = String::new();
    stream.read_to_string(&mut received).await.unwrap();
    task.abort();

    assert!(received.starts_with("HTTP/1.1 200 OK\r\n"), "received: {received}");
    assert!(received.contains(r#"{"id":101,"data":"my stuff posted"}"#));
    assert!(received.ends_with("\r\n\r\nMINE!"));
    assert_eq!(received.matches("HTTP/1.1 200 OK").count(), 2);
}

#[tokio::test]
async fn body_on_get_does_not_swallow_next_request() {
    let tcp_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = tcp_listener.local_addr().unwrap();
    let server = Server::builder().router(demo_router(false)).bind(address.to_string()).build().unwrap();
    let task = tokio::spawn(server.serve(tcp_listener));

    let raw_request = concat!(
        "GET /junk/mine HTTP/1.1\r\n",
        "Content-Length: 5\r\n",
        "\r\n",
        "hello",
        "GET /junk/yours HTTP/1.1\r\n",
        "Connection: close\r\n",
        "\r\n",
    );

    let mut stream = TcpStream::connect(address).await.unwrap();
    stream.write_all(raw_request.as_bytes()).await.unwrap();
    let mut received = String::new();
    stream.read_to_string(&mut received).await.unwrap();
    task.abort();

    assert_eq!(received.matches("HTTP/1.1 200 OK").count(), 2, "received: {received}");
    assert!(received.contains("\r\n\r\nMINE!HTTP/1.1 200 OK"));
    assert!(received.ends_with("\r\n\r\nYOURS!"));
}
