#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use taskgate_core::Role;
use taskgate_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8080"
subjects:
  - id: "u1"
    ticket: "t1"
    roles: ["user"]
    blockd_by: ["u2"] # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
subjects:
  - id: "u1"
    ticket: "t1"
    roles: ["user"]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.subjects[0].id, "u1");
    assert!(cfg.subjects[0].roles.contains(&Role::User));
    assert!(cfg.seed.tasks.is_empty());
}

#[test]
fn wrong_version_is_rejected() {
    let bad = r#"
version: 2
subjects:
  - { id: "u1", ticket: "t1", roles: ["user"] }
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn empty_roles_are_rejected() {
    let bad = r#"
version: 1
subjects:
  - { id: "u1", ticket: "t1", roles: [] }
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn duplicate_tickets_are_rejected() {
    let bad = r#"
version: 1
subjects:
  - { id: "u1", ticket: "same", roles: ["user"] }
  - { id: "u2", ticket: "same", roles: ["admin"] }
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("duplicate ticket"));
}

#[test]
fn unknown_role_tags_are_kept() {
    let ok = r#"
version: 1
subjects:
  - { id: "u1", ticket: "t1", roles: ["auditor"] }
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert!(cfg.subjects[0].roles.contains(&Role::Unknown("auditor".into())));
}

#[test]
fn bad_listen_address_is_rejected() {
    let bad = r#"
version: 1
gateway: { listen: "not-an-addr" }
subjects:
  - { id: "u1", ticket: "t1", roles: ["user"] }
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn seed_comment_must_reference_seeded_task() {
    let bad = r#"
version: 1
subjects:
  - { id: "u1", ticket: "t1", roles: ["user"] }
seed:
  tasks:
    - { id: "todo_1", title: "x", owner_id: "u1" }
  comments:
    - { id: "1", body: "hi", author_id: "u1", task_id: "todo_9" }
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("unknown task todo_9"));
}

#[test]
fn shipped_config_is_valid() {
    let cfg = config::load_from_str(include_str!("../../../taskgate.yaml")).expect("must parse");
    assert_eq!(cfg.subjects.len(), 4);
    assert_eq!(cfg.seed.tasks.len(), 10);
}
