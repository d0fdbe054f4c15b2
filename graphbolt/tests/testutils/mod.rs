//! Test utilities for GraphBolt integration tests
//!
//! Provides a connected fixture backed by the scriptable in-memory engine,
//! with a standard set of queries covering scalars, graph entities, server
//! failures and transport faults.

#![allow(dead_code)]

use graphbolt::engine::mock::{MockEngine, Script, ScriptedRows};
use graphbolt::engine::wire::{MapEntry, WireNode, WirePath, WireRelationship, WireSegment, WireValue};
use graphbolt::engine::{
    FailureDetails, STATEMENT_CONTROL, STATEMENT_READ_ONLY, STATEMENT_WRITE_ONLY,
};
use graphbolt::{Client, Config, ConnectOptions, Connection};
use std::sync::Arc;

pub const PEOPLE_QUERY: &str = "MATCH (p:Person) RETURN p.name";
pub const GRAPH_QUERY: &str = "MATCH (p:Person {name: 'James Thompson'}) RETURN p, p.tags, p.meta";
pub const PATH_QUERY: &str =
    "MATCH path=shortestPath((:Person{name:\"James Thompson\"})-[:FOLLOWS*]-(:Person{name:\"Cat Smith\"})) RETURN path";
pub const REL_QUERY: &str = "MATCH ()-[r:FOLLOWS]->() RETURN r";
pub const IDENTITY_QUERY: &str = "MATCH (n) RETURN id(n)";
pub const WRITE_QUERY: &str = "CREATE (p:Person {name: 'Zed'})";
pub const BAD_QUERY: &str = "MATCH (n RETURN n";
pub const FAULTY_QUERY: &str = "MATCH (n) RETURN n.flaky";
pub const UNKNOWN_KIND_QUERY: &str = "CALL weird.procedure()";
pub const REJECTED_QUERY: &str = "";

/// Connected fixture over a fully scripted mock engine
pub struct TestFixture {
    pub engine: Arc<MockEngine>,
    pub client: Client,
    pub connection: Connection,
}

impl TestFixture {
    pub fn new() -> Self {
        init_logging();
        let engine = Arc::new(scripted_engine());
        let client = Client::new(engine.clone());
        let connection = client
            .connect("bolt://localhost:7687", ConnectOptions::default())
            .expect("mock connect should succeed");
        Self {
            engine,
            client,
            connection,
        }
    }

    pub fn with_config(config: Config) -> Self {
        init_logging();
        let engine = Arc::new(scripted_engine());
        let client = Client::new(engine.clone());
        let connection = client
            .connect_with_config("bolt://localhost:7687", config, ConnectOptions::default())
            .expect("mock connect should succeed");
        Self {
            engine,
            client,
            connection,
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Engine scripted with the standard test dataset
pub fn scripted_engine() -> MockEngine {
    MockEngine::new()
        .script(
            PEOPLE_QUERY,
            Script::Rows(
                ScriptedRows::new(vec!["p.name"])
                    .row(vec![WireValue::string("James Thompson")])
                    .row(vec![WireValue::string("Angela Scope")])
                    .row(vec![WireValue::string("Cat Smith")]),
            ),
        )
        .script(
            GRAPH_QUERY,
            Script::Rows(
                ScriptedRows::new(vec!["p", "p.tags", "p.meta"]).row(vec![
                    WireValue::Node(Arc::new(james_thompson())),
                    WireValue::list(vec![
                        WireValue::Int(1),
                        WireValue::string("two"),
                        WireValue::Null,
                    ]),
                    WireValue::map(vec![
                        MapEntry::new("zip", WireValue::string("12401")),
                        MapEntry::new("city", WireValue::string("Kingston")),
                    ]),
                ]),
            ),
        )
        .script(
            PATH_QUERY,
            Script::Rows(ScriptedRows::new(vec!["path"]).row(vec![follows_path()])),
        )
        .script(
            REL_QUERY,
            Script::Rows(
                ScriptedRows::new(vec!["r"])
                    .row(vec![WireValue::Relationship(Arc::new(unbound_follows()))]),
            ),
        )
        .script(
            IDENTITY_QUERY,
            Script::Rows(ScriptedRows::new(vec!["id(n)"]).row(vec![WireValue::Identity(42)])),
        )
        .script(
            WRITE_QUERY,
            Script::Rows(ScriptedRows::new(Vec::<String>::new()).statement_kind(STATEMENT_WRITE_ONLY)),
        )
        .script(BAD_QUERY, Script::Failure(syntax_failure()))
        .script(
            FAULTY_QUERY,
            Script::Rows(
                ScriptedRows::new(vec!["n.flaky"])
                    .row(vec![WireValue::Int(1)])
                    .row(vec![WireValue::Int(2)])
                    .fault_after(1),
            ),
        )
        .script(
            UNKNOWN_KIND_QUERY,
            Script::Rows(ScriptedRows::new(vec!["x"]).statement_kind(99)),
        )
        .script(
            REJECTED_QUERY,
            Script::RejectSubmit("empty statement".to_string()),
        )
}

/// The syntax failure reported for `BAD_QUERY`
pub fn syntax_failure() -> FailureDetails {
    FailureDetails {
        code: "Neo.ClientError.Statement.SyntaxError".to_string(),
        message: "Invalid input 'R'".to_string(),
        description: "Invalid input 'R': expected ')' or a parameter".to_string(),
        line: 1,
        column: 10,
        offset: 9,
        context: BAD_QUERY.to_string(),
        context_offset: 9,
    }
}

pub fn james_thompson() -> WireNode {
    WireNode {
        identity: 1,
        labels: vec![Arc::from("Person")],
        properties: vec![
            MapEntry::new("name", WireValue::string("James Thompson")),
            MapEntry::new("age", WireValue::Int(47)),
        ],
    }
}

pub fn angela_scope() -> WireNode {
    WireNode {
        identity: 2,
        labels: vec![Arc::from("Person")],
        properties: vec![MapEntry::new("name", WireValue::string("Angela Scope"))],
    }
}

pub fn cat_smith() -> WireNode {
    WireNode {
        identity: 3,
        labels: vec![Arc::from("Person")],
        properties: vec![MapEntry::new("name", WireValue::string("Cat Smith"))],
    }
}

fn follows(identity: i64, start: i64, end: i64) -> WireRelationship {
    WireRelationship {
        identity,
        start_node: Some(start),
        end_node: Some(end),
        reltype: Arc::from("FOLLOWS"),
        properties: vec![MapEntry::new("since", WireValue::Int(2020))],
    }
}

/// Relationship with unresolved endpoints, as servers send inside some path
/// projections
pub fn unbound_follows() -> WireRelationship {
    WireRelationship {
        identity: 12,
        start_node: None,
        end_node: None,
        reltype: Arc::from("FOLLOWS"),
        properties: Vec::new(),
    }
}

/// Length-2 path: (1)-[10]->(2)<-[11]-(3); the second hop traverses its
/// relationship in reverse
pub fn follows_path() -> WireValue {
    WireValue::Path(Arc::new(WirePath {
        nodes: vec![
            Arc::new(james_thompson()),
            Arc::new(angela_scope()),
            Arc::new(cat_smith()),
        ],
        segments: vec![
            WireSegment {
                relationship: Arc::new(follows(10, 1, 2)),
                forward: true,
            },
            WireSegment {
                relationship: Arc::new(follows(11, 3, 2)),
                forward: false,
            },
        ],
    }))
}

/// Empty result set classified as a control statement
pub fn control_rows() -> Script {
    Script::Rows(ScriptedRows::new(Vec::<String>::new()).statement_kind(STATEMENT_CONTROL))
}

/// Read-only three-row result for ad-hoc engines
pub fn three_ints(field: &str) -> Script {
    Script::Rows(
        ScriptedRows::new(vec![field])
            .row(vec![WireValue::Int(1)])
            .row(vec![WireValue::Int(2)])
            .row(vec![WireValue::Int(3)])
            .statement_kind(STATEMENT_READ_ONLY),
    )
}
