use notesync_core::{ClientConfig, DbRequestError, HttpNoteDbClient, NoteDbClient, UserKey};
use serde_json::{json, Value};
use std::io::Read;
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use tiny_http::{Response, Server};

struct Recorded {
    method: String,
    url: String,
    content_type: Option<String>,
    body: Value,
}

/// Serves one canned `(status, body)` response per incoming request.
fn serve(responses: Vec<(u16, &'static str)>) -> (HttpNoteDbClient, JoinHandle<Vec<Recorded>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let mut request = server.recv().unwrap();
            let mut raw = String::new();
            request.as_reader().read_to_string(&mut raw).unwrap();
            let content_type = request
                .headers()
                .iter()
                .find(|header| header.field.equiv("Content-Type"))
                .map(|header| header.value.as_str().to_string());
            seen.push(Recorded {
                method: request.method().to_string(),
                url: request.url().to_string(),
                content_type,
                body: serde_json::from_str(&raw).unwrap(),
            });
            request
                .respond(Response::from_string(body).with_status_code(status))
                .unwrap();
        }
        seen
    });

    let client =
        HttpNoteDbClient::new(&ClientConfig::with_base_url(format!("http://127.0.0.1:{port}")))
            .unwrap();
    (client, handle)
}

fn unreachable_client() -> HttpNoteDbClient {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    HttpNoteDbClient::new(&ClientConfig::with_base_url(format!("http://127.0.0.1:{port}")))
        .unwrap()
}

#[test]
fn get_user_builds_user_from_ok_response() {
    let (client, server) = serve(vec![(
        200,
        r#"{"groceries":["milk","eggs"],"work":["ship release"],"empty":[]}"#,
    )]);

    let user = client
        .get_user(&UserKey::new("alice"))
        .unwrap()
        .expect("200 response should produce a user");

    assert_eq!(user.name(), "alice");
    assert_eq!(user.category_names(), vec!["empty", "groceries", "work"]);
    assert_eq!(
        user.category("groceries").unwrap().notes(),
        ["milk".to_string(), "eggs".to_string()]
    );
    assert_eq!(
        user.category("work").unwrap().notes(),
        ["ship release".to_string()]
    );
    assert!(user.category("empty").unwrap().is_empty());
    assert!(user
        .categories()
        .all(|category| category.owner() == user.key()));

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].url, "/getAll");
    assert_eq!(requests[0].body, json!({ "user": "alice" }));
    assert!(requests[0]
        .content_type
        .as_deref()
        .unwrap_or("")
        .starts_with("application/json"));
}

#[test]
fn get_user_returns_none_for_non_ok_status() {
    let (client, server) = serve(vec![(404, "missing"), (500, "boom")]);

    assert!(client.get_user(&UserKey::new("ghost")).unwrap().is_none());
    assert!(client.get_user(&UserKey::new("ghost")).unwrap().is_none());

    server.join().unwrap();
}

#[test]
fn get_user_treats_empty_or_null_ok_body_as_absent() {
    let (client, server) = serve(vec![(200, ""), (200, "null"), (200, "  \n")]);

    assert!(client.get_user(&UserKey::new("ghost")).unwrap().is_none());
    assert!(client.get_user(&UserKey::new("ghost")).unwrap().is_none());
    assert!(client.get_user(&UserKey::new("ghost")).unwrap().is_none());

    server.join().unwrap();
}

#[test]
fn get_user_wraps_malformed_body() {
    let (client, server) = serve(vec![(200, r#"{"work": "not-a-list"}"#)]);

    let err = client.get_user(&UserKey::new("alice")).unwrap_err();
    assert!(matches!(err, DbRequestError::Decode { .. }));
    assert_eq!(err.operation(), "get_user");

    server.join().unwrap();
}

#[test]
fn mutations_post_expected_payloads_and_ignore_bodies() {
    let (client, server) = serve(vec![
        (200, "whatever"),
        (500, ""),
        (200, "{}"),
    ]);
    let key = UserKey::new("alice").category("groceries");

    client.add_note(&key, "milk").unwrap();
    client.remove_note(&key, "milk").unwrap();
    client.create_category(&key).unwrap();

    let requests = server.join().unwrap();
    let urls = requests
        .iter()
        .map(|request| request.url.as_str())
        .collect::<Vec<_>>();
    assert_eq!(urls, vec!["/addToDo", "/removeToDo", "/addType"]);
    assert!(requests.iter().all(|request| request.method == "POST"));

    let note_body = json!({ "list": "groceries", "user": "alice", "name": "milk" });
    assert_eq!(requests[0].body, note_body);
    assert_eq!(requests[1].body, note_body);
    assert_eq!(requests[2].body, json!({ "list": "groceries" }));
}

#[test]
fn transport_failures_are_wrapped_for_every_operation() {
    let client = unreachable_client();
    let key = UserKey::new("alice").category("groceries");

    let failures = vec![
        client.get_user(&UserKey::new("alice")).map(|_| ()).unwrap_err(),
        client.add_note(&key, "milk").unwrap_err(),
        client.remove_note(&key, "milk").unwrap_err(),
        client.create_category(&key).unwrap_err(),
    ];

    let operations = failures
        .iter()
        .map(DbRequestError::operation)
        .collect::<Vec<_>>();
    assert_eq!(
        operations,
        vec!["get_user", "add_note", "remove_note", "create_category"]
    );
    assert!(failures
        .iter()
        .all(|err| matches!(err, DbRequestError::Transport { .. })));
}
