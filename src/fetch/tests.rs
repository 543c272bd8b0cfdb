// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    io::{BufRead, BufReader, Write},
    net::TcpListener,
    thread::JoinHandle,
};

use tempfile::TempDir;

use super::*;

/// Serve the given (status line, body) responses, one per connection, then
/// stop. Returns the base URL and a handle that yields the number of
/// connections served.
pub(crate) fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut served = 0;
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            // Consume the request headers.
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            loop {
                line.clear();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
            served += 1;
        }
        served
    });
    (url, handle)
}

fn fetcher(retries: u32) -> Fetcher {
    Fetcher::new(Duration::from_secs(5), retries)
        .unwrap()
        .with_initial_backoff(Duration::from_millis(1))
}

#[test]
fn test_get_text() {
    let (url, handle) = serve(vec![("200 OK", r#"{"type":"FeatureCollection"}"#)]);
    let text = fetcher(0).get_text(&format!("{url}/data.json")).unwrap();
    assert_eq!(text, r#"{"type":"FeatureCollection"}"#);
    assert_eq!(handle.join().unwrap(), 1);
}

#[test]
fn test_server_errors_are_retried() {
    let (url, handle) = serve(vec![
        ("503 Service Unavailable", "busy"),
        ("500 Internal Server Error", "oops"),
        ("200 OK", "finally"),
    ]);
    let text = fetcher(2).get_text(&url).unwrap();
    assert_eq!(text, "finally");
    assert_eq!(handle.join().unwrap(), 3);
}

#[test]
fn test_retries_are_bounded() {
    let (url, handle) = serve(vec![
        ("503 Service Unavailable", "busy"),
        ("503 Service Unavailable", "busy"),
    ]);
    let result = fetcher(1).get_text(&url);
    match result {
        Err(FetchError::Status { status, .. }) => {
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE)
        }
        other => panic!("Expected a status error, got {other:?}"),
    }
    assert_eq!(handle.join().unwrap(), 2);
}

#[test]
fn test_client_errors_are_not_retried() {
    let (url, handle) = serve(vec![("404 Not Found", "")]);
    let result = fetcher(3).get_text(&url);
    assert!(matches!(result, Err(FetchError::Status { .. })));
    assert_eq!(handle.join().unwrap(), 1);
}

#[test]
fn test_download_writes_file_atomically() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let path = tmp_dir.path().join("nested").join("hip_main.dat");

    let (url, handle) = serve(vec![("200 OK", "H|1|\n")]);
    fetcher(0).download(&url, &path).unwrap();
    handle.join().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "H|1|\n");
    assert!(!path.with_extension("tmp").exists());

    let (url, handle) = serve(vec![("404 Not Found", "")]);
    let other = tmp_dir.path().join("other.dat");
    assert!(fetcher(0).download(&url, &other).is_err());
    handle.join().unwrap();
    assert!(!other.exists());
    assert!(!other.with_extension("tmp").exists());
}

#[test]
fn test_backoff_doubles() {
    let initial = Duration::from_millis(500);
    assert_eq!(backoff_delay(initial, 0), Duration::from_millis(500));
    assert_eq!(backoff_delay(initial, 1), Duration::from_secs(1));
    assert_eq!(backoff_delay(initial, 3), Duration::from_secs(4));
    // Doesn't overflow.
    assert!(backoff_delay(initial, 100) >= Duration::from_secs(1000));
}
