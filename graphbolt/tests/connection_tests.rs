//! Connection lifecycle and client entry points

#[path = "testutils/mod.rs"]
mod testutils;

use graphbolt::{Client, Config, ConnectOptions, Error};
use std::sync::Arc;
use testutils::*;

#[test]
fn test_connection_snapshot_accessors() {
    let fixture = TestFixture::new();
    let con = &fixture.connection;
    assert_eq!(con.hostname(), "localhost");
    assert_eq!(con.port(), 7687);
    assert!(con.is_secure());
    assert!(!con.credentials_expired());
    assert_eq!(con.server_id().as_deref(), Some("Mock/1.0"));
}

#[test]
fn test_configured_username_is_reported() {
    let fixture = TestFixture::with_config(Config::new().with_username("neo"));
    assert_eq!(fixture.connection.username().as_deref(), Some("neo"));
}

#[test]
fn test_connect_failure() {
    init_logging();
    let engine = Arc::new(scripted_engine().refuse_connections("no route to host"));
    let client = Client::new(engine);
    match client.connect("bolt://db.invalid", ConnectOptions::default()) {
        Err(Error::Connection(message)) => assert!(message.contains("no route to host")),
        other => panic!("expected connection error, got {:?}", other.map(|_| "connection")),
    }
}

#[test]
fn test_open_by_host_and_port() {
    init_logging();
    let engine = Arc::new(scripted_engine());
    let client = Client::new(engine);
    let con = client
        .open("graph.internal", 7688, Config::default(), true)
        .expect("open");
    assert_eq!(con.hostname(), "graph.internal");
    assert_eq!(con.port(), 7688);
    // The insecure flag downgrades the channel
    assert!(!con.is_secure());
}

#[test]
fn test_insecure_uri_connect() {
    init_logging();
    let engine = Arc::new(scripted_engine());
    let client = Client::new(engine);
    let con = client
        .connect("bolt://localhost", ConnectOptions::insecure())
        .expect("connect");
    assert!(!con.is_secure());
}

#[test]
fn test_reset_reaches_the_engine() {
    let fixture = TestFixture::new();
    fixture.connection.reset().expect("reset");
    fixture.connection.reset().expect("reset");
    assert_eq!(fixture.engine.stats().resets(), 2);
}

#[test]
fn test_streams_keep_the_session_alive() {
    let fixture = TestFixture::new();
    let engine = fixture.engine.clone();

    let mut stream = fixture.connection.run(PEOPLE_QUERY).expect("run");
    drop(fixture);
    assert_eq!(engine.stats().session_closes(), 0);

    // The stream still works through its shared connection core
    let row = stream.fetch_next().expect("fetch").expect("row");
    assert_eq!(
        row.field(0).expect("field").as_str().expect("str"),
        "James Thompson"
    );
    assert_eq!(stream.connection().hostname(), "localhost");

    drop(stream);
    assert_eq!(engine.stats().session_closes(), 1);
}

#[test]
fn test_connection_clones_share_one_session() {
    let fixture = TestFixture::new();
    let engine = fixture.engine.clone();
    let copy = fixture.connection.clone();

    drop(fixture);
    assert_eq!(engine.stats().session_closes(), 0);
    assert_eq!(copy.hostname(), "localhost");

    drop(copy);
    assert_eq!(engine.stats().session_closes(), 1);
}

#[test]
fn test_client_identity() {
    assert!(!Client::version().is_empty());
    assert!(Client::default_client_id().contains('/'));
}
