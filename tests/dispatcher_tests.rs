use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use brrtmux::{param_value, Body, Dispatcher, MethodHandler, RequestExt, Router};
use http::header::ALLOW;
use http::{Method, Request, Response, StatusCode};

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::new())
        .expect("valid request")
}

fn text(body: &'static str) -> impl Fn(Request<Body>) -> Response<Body> + Send + Sync + 'static {
    move |_req| Response::new(Body::from_static(body.as_bytes()))
}

fn body_str(res: &Response<Body>) -> &str {
    std::str::from_utf8(res.body()).expect("utf-8 body")
}

/// Records whether a handler ran and which params it saw.
#[derive(Clone, Default)]
struct Probe {
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl Probe {
    fn handler(
        &self,
        names: &'static [&'static str],
    ) -> impl Fn(Request<Body>) -> Response<Body> + Send + Sync + 'static {
        let probe = self.clone();
        move |req| {
            probe.calls.fetch_add(1, Ordering::SeqCst);
            let mut seen = probe.seen.lock().expect("probe lock");
            for name in names {
                seen.push((name.to_string(), req.param(name).map(str::to_string)));
            }
            Response::new(Body::from_static(b"probe"))
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Vec<(String, Option<String>)> {
        self.seen.lock().expect("probe lock").clone()
    }
}

struct Case {
    method: &'static str,
    request_method: Method,
    pattern: &'static str,
    request_url: &'static str,
    want_called: bool,
    want_params: &'static [(&'static str, &'static str)],
}

#[test]
fn test_handle_fn_table() {
    let cases = [
        Case {
            method: "GET",
            request_method: Method::GET,
            pattern: "/foo",
            request_url: "/bar",
            want_called: false,
            want_params: &[],
        },
        Case {
            method: "GET",
            request_method: Method::POST,
            pattern: "/foo",
            request_url: "/foo",
            want_called: false,
            want_params: &[],
        },
        Case {
            method: "*",
            request_method: Method::POST,
            pattern: "/foo",
            request_url: "/foo",
            want_called: true,
            want_params: &[],
        },
        Case {
            method: "*",
            request_method: Method::POST,
            pattern: "/foo",
            request_url: "/bar",
            want_called: false,
            want_params: &[],
        },
        Case {
            method: "POST",
            request_method: Method::POST,
            pattern: "/hello/{name}",
            request_url: "/hello/world",
            want_called: true,
            want_params: &[("name", "world")],
        },
        Case {
            method: "POST",
            request_method: Method::GET,
            pattern: "/hello/{name}",
            request_url: "/hello/world",
            want_called: false,
            want_params: &[],
        },
        Case {
            method: "PATCH",
            request_method: Method::PATCH,
            pattern: "/foo/{foo}/baz/{baz}",
            request_url: "/foo/bar/baz/qux",
            want_called: true,
            want_params: &[("foo", "bar"), ("baz", "qux")],
        },
        Case {
            method: "*",
            request_method: Method::PATCH,
            pattern: "/foo/{foo}/baz/{baz}",
            request_url: "/foo/bar/baz/qux",
            want_called: true,
            want_params: &[("foo", "bar"), ("baz", "qux")],
        },
        Case {
            method: "DELETE",
            request_method: Method::DELETE,
            pattern: "/foo/{foo}/baz/{baz}",
            request_url: "/foo/bar/baz/qux",
            want_called: true,
            want_params: &[("foo", "bar"), ("baz", "qux")],
        },
        Case {
            method: "OPTIONS",
            request_method: Method::OPTIONS,
            pattern: "/foo/{foo}",
            request_url: "/foo/bar/baz",
            want_called: false,
            want_params: &[],
        },
        Case {
            method: "HEAD",
            request_method: Method::HEAD,
            pattern: "/foo/*",
            request_url: "/baz/qux",
            want_called: false,
            want_params: &[],
        },
    ];

    for case in cases {
        let called = Arc::new(Mutex::new(None::<Vec<(String, Option<String>)>>));
        let names: Vec<&'static str> = case.want_params.iter().map(|(k, _)| *k).collect();

        let mut router = Router::new();
        let record = Arc::clone(&called);
        router
            .handle_fn(case.method, case.pattern, move |req: Request<Body>| {
                let got = names
                    .iter()
                    .map(|n| (n.to_string(), param_value(&req, n).map(str::to_string)))
                    .collect();
                *record.lock().expect("record lock") = Some(got);
                Response::new(Body::new())
            })
            .expect("route registers");

        let dispatcher = Dispatcher::new(router);
        let _res = dispatcher.dispatch(request(case.request_method.clone(), case.request_url));

        let got = called.lock().expect("record lock").clone();
        assert_eq!(
            got.is_some(),
            case.want_called,
            "{} {} against {} {}",
            case.request_method,
            case.request_url,
            case.method,
            case.pattern
        );
        if let Some(got) = got {
            let want: Vec<_> = case
                .want_params
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect();
            assert_eq!(got, want, "params for {}", case.request_url);
        }
    }
}

#[test]
fn test_static_wins_over_dynamic() {
    let static_probe = Probe::default();
    let dynamic_probe = Probe::default();

    let mut router = Router::new();
    router.get("/users/{id}", dynamic_probe.handler(&["id"])).unwrap();
    router.get("/users/me", static_probe.handler(&[])).unwrap();
    let dispatcher = Dispatcher::new(router);

    dispatcher.dispatch(request(Method::GET, "/users/me"));
    dispatcher.dispatch(request(Method::GET, "/users/./me"));
    assert_eq!(static_probe.calls(), 2);
    assert_eq!(dynamic_probe.calls(), 0);
}

#[test]
fn test_special_characters_in_param() {
    let probe = Probe::default();
    let mut router = Router::new();
    router.put("/hello/{name}", probe.handler(&["name"])).unwrap();
    let dispatcher = Dispatcher::new(router);

    let res = dispatcher.dispatch(request(Method::PUT, "/hello/a&b%20c"));

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        probe.seen(),
        vec![("name".to_string(), Some("a&b c".to_string()))]
    );
}

#[test]
fn test_path_is_decoded_exactly_once() {
    let probe = Probe::default();
    let mut router = Router::new();
    router.get("/hello/{name}", probe.handler(&["name"])).unwrap();
    let dispatcher = Dispatcher::new(router);

    dispatcher.dispatch(request(Method::GET, "/hello/a%20b"));
    dispatcher.dispatch(request(Method::GET, "/hello/a%2520b"));
    assert_eq!(
        probe.seen(),
        vec![
            ("name".to_string(), Some("a b".to_string())),
            ("name".to_string(), Some("a%20b".to_string())),
        ]
    );
}

#[test]
fn test_static_route_with_encoded_literal() {
    let mut router = Router::new();
    router.get("/hello world", text("spaced")).unwrap();
    let dispatcher = Dispatcher::new(router);

    let res = dispatcher.dispatch(request(Method::GET, "/hello%20world"));
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_str(&res), "spaced");
}

#[test]
fn test_invalid_utf8_path_is_not_found() {
    let probe = Probe::default();
    let mut router = Router::new();
    router.get("/files/*", probe.handler(&[])).unwrap();
    let dispatcher = Dispatcher::new(router);

    let res = dispatcher.dispatch(request(Method::GET, "/files/%FF%FE"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(probe.calls(), 0);
}

#[test]
fn test_wildcard_crosses_segments() {
    let probe = Probe::default();
    let mut router = Router::new();
    router.get("/assets/*", probe.handler(&[])).unwrap();
    router.get("/one/{seg}", text("one")).unwrap();
    let dispatcher = Dispatcher::new(router);

    let res = dispatcher.dispatch(request(Method::GET, "/assets/css/site/main.css"));
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(probe.calls(), 1);

    let res = dispatcher.dispatch(request(Method::GET, "/one/a/b"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_wildcard_only_pattern_has_no_params() {
    let mut router = Router::new();
    router
        .get("/raw/*", |req: Request<Body>| {
            assert!(req.params().is_none());
            Response::new(Body::from_static(b"raw"))
        })
        .unwrap();
    let dispatcher = Dispatcher::new(router);
    let res = dispatcher.dispatch(request(Method::GET, "/raw/x/y"));
    assert_eq!(body_str(&res), "raw");
}

#[test]
fn test_method_not_allowed_lists_methods_in_order() {
    let mut router = Router::new();
    router.get("/items", text("get")).unwrap();
    router.post("/items", text("post")).unwrap();
    let dispatcher = Dispatcher::new(router);

    let res = dispatcher.dispatch(request(Method::PUT, "/items"));
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        res.headers().get(ALLOW).and_then(|v| v.to_str().ok()),
        Some("GET, POST")
    );
    assert_eq!(body_str(&res), "Method Not Allowed\n");
}

#[test]
fn test_method_not_allowed_on_dynamic_route() {
    let mut router = Router::new();
    router.get("/items/{id}", text("get")).unwrap();
    router.delete("/items/{id}", text("delete")).unwrap();
    let dispatcher = Dispatcher::new(router);

    let res = dispatcher.dispatch(request(Method::POST, "/items/7"));
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        res.headers().get(ALLOW).and_then(|v| v.to_str().ok()),
        Some("GET, DELETE")
    );
}

#[test]
fn test_unregistered_path_not_found() {
    let dispatcher = Dispatcher::new(Router::new());
    let res = dispatcher.dispatch(request(Method::GET, "/nope"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_str(&res), "404 page not found\n");
}

#[test]
fn test_trailing_slash_strictness() {
    let mut router = Router::new();
    router.get("/test/", text("slash")).unwrap();
    router.get("/plain", text("plain")).unwrap();
    let dispatcher = Dispatcher::new(router);

    assert_eq!(
        dispatcher.dispatch(request(Method::GET, "/test/")).status(),
        StatusCode::OK
    );
    assert_eq!(
        dispatcher.dispatch(request(Method::GET, "/test")).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        dispatcher.dispatch(request(Method::GET, "/plain/")).status(),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn test_path_normalized_before_lookup() {
    let mut router = Router::new();
    router.get("/a/b", text("ab")).unwrap();
    let dispatcher = Dispatcher::new(router);

    for path in ["/a//b", "/a/./b", "/a/c/../b", "//a/b"] {
        let res = dispatcher.dispatch(request(Method::GET, path));
        assert_eq!(body_str(&res), "ab", "path {path}");
    }
}

#[test]
fn test_file_name_and_extension() {
    let probe = Probe::default();
    let mut router = Router::new();
    router
        .get("/file/{name}.{ext}", probe.handler(&["name", "ext"]))
        .unwrap();
    let dispatcher = Dispatcher::new(router);

    dispatcher.dispatch(request(Method::GET, "/file/report.txt"));
    assert_eq!(
        probe.seen(),
        vec![
            ("name".to_string(), Some("report".to_string())),
            ("ext".to_string(), Some("txt".to_string())),
        ]
    );
}

#[test]
fn test_dispatch_is_idempotent() {
    let probe = Probe::default();
    let mut router = Router::new();
    router.get("/u/{id}", probe.handler(&["id"])).unwrap();
    let dispatcher = Dispatcher::new(router);

    let first = dispatcher.dispatch(request(Method::GET, "/u/9"));
    let second = dispatcher.dispatch(request(Method::GET, "/u/9"));
    assert_eq!(first.status(), second.status());
    assert_eq!(probe.calls(), 2);
    let seen = probe.seen();
    assert_eq!(seen[0], seen[1]);
}

#[test]
fn test_handler_invoked_exactly_once() {
    let probe = Probe::default();
    let other = Probe::default();
    let mut router = Router::new();
    router.get("/x/{a}", probe.handler(&[])).unwrap();
    router.get("/x/*", other.handler(&[])).unwrap();
    router.handle_fn("*", "/x/{a}", other.handler(&[])).unwrap();
    let dispatcher = Dispatcher::new(router);

    dispatcher.dispatch(request(Method::GET, "/x/1"));
    assert_eq!(probe.calls(), 1);
    assert_eq!(other.calls(), 0);
}

#[test]
fn test_custom_fallbacks() {
    let mut router = Router::new();
    router.get("/only-get", text("ok")).unwrap();
    let dispatcher = Dispatcher::new(router)
        .with_not_found_fn(|req: Request<Body>| {
            let mut res = Response::new(Body::from(format!("missing {}", req.uri().path())));
            *res.status_mut() = StatusCode::NOT_FOUND;
            res
        })
        .with_method_not_allowed_fn(|_req: Request<Body>, allow: &[Method]| {
            let mut res = Response::new(Body::from(format!("try {}", allow.len())));
            *res.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
            res
        });

    let res = dispatcher.dispatch(request(Method::GET, "/elsewhere"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_str(&res), "missing /elsewhere");

    let res = dispatcher.dispatch(request(Method::POST, "/only-get"));
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_str(&res), "try 1");
    assert!(res.headers().get(ALLOW).is_none());
}

#[test]
fn test_method_handler_on_any_route() {
    let users = MethodHandler::new()
        .on_fn(Method::GET, text("list"))
        .on_fn(Method::POST, text("create"));

    let mut router = Router::new();
    router.handle("*", "/users", Arc::new(users)).unwrap();
    let dispatcher = Dispatcher::new(router);

    assert_eq!(body_str(&dispatcher.dispatch(request(Method::POST, "/users"))), "create");
    let res = dispatcher.dispatch(request(Method::DELETE, "/users"));
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        res.headers().get(ALLOW).and_then(|v| v.to_str().ok()),
        Some("GET, POST")
    );
}

#[test]
fn test_dispatcher_is_a_handler() {
    use brrtmux::Handler;

    let mut inner = Router::new();
    inner.get("/ping", text("pong")).unwrap();
    let inner: Arc<dyn Handler> = Arc::new(Dispatcher::new(inner));

    let mut outer = Router::new();
    outer.handle("*", "/ping", inner).unwrap();
    let outer = Dispatcher::new(outer);

    assert_eq!(body_str(&outer.call(request(Method::GET, "/ping"))), "pong");
}

#[test]
fn test_shared_across_threads() {
    let mut router = Router::new();
    router
        .get("/n/{n}", |req: Request<Body>| {
            Response::new(Body::from(req.param("n").unwrap_or_default().to_string()))
        })
        .unwrap();
    let dispatcher = Arc::new(Dispatcher::new(router));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                let res = dispatcher.dispatch(request(Method::GET, &format!("/n/{i}")));
                std::str::from_utf8(res.body()).expect("utf-8").to_string()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().expect("thread"), i.to_string());
    }
}
