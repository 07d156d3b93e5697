//! Decision properties checked exhaustively over small role/instance grids.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeSet;

use taskgate_core::{evaluate, Action, Comment, Instance, ResourceKind, Role, Subject, Task};

const ROLE_TAGS: [&str; 4] = ["admin", "moderator", "user", "guest"];

fn task(owner: &str, invited: &[&str], completed: bool) -> Task {
    Task {
        id: "todo_1".into(),
        title: "Complete project presentation".into(),
        owner_id: owner.into(),
        invited_users: invited.iter().map(|s| s.to_string()).collect(),
        completed,
    }
}

fn comment(author: &str) -> Comment {
    Comment {
        id: "1".into(),
        body: "Great progress on this task!".into(),
        author_id: author.into(),
        task_id: "todo_1".into(),
        created_at_ms: 0,
    }
}

fn subject(id: &str, roles: &BTreeSet<Role>) -> Subject {
    let mut s = Subject::new(id).blocked_by("author1");
    s.roles = roles.clone();
    s
}

fn role_sets() -> Vec<BTreeSet<Role>> {
    (0u32..1 << ROLE_TAGS.len())
        .map(|mask| {
            ROLE_TAGS
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, t)| Role::from(*t))
                .collect()
        })
        .collect()
}

fn tasks() -> Vec<Task> {
    vec![
        task("u1", &[], false),
        task("u1", &[], true),
        task("u2", &["u1"], false),
        task("u2", &["u1"], true),
        task("u2", &[], true),
    ]
}

fn comments() -> Vec<Comment> {
    vec![comment("u1"), comment("author1"), comment("author2")]
}

/// Every (kind, action, instance) combination we care about, instance-less included.
fn each_case(mut f: impl FnMut(ResourceKind, Action, Option<Instance<'_>>)) {
    let tasks = tasks();
    let comments = comments();
    for action in Action::ALL {
        f(ResourceKind::Task, action, None);
        for t in &tasks {
            f(ResourceKind::Task, action, Some(Instance::Task(t)));
        }
        f(ResourceKind::Comment, action, None);
        for c in &comments {
            f(ResourceKind::Comment, action, Some(Instance::Comment(c)));
        }
    }
}

#[test]
fn adding_roles_never_revokes_access() {
    let sets = role_sets();
    each_case(|kind, action, instance| {
        for small in &sets {
            if !evaluate(&subject("u1", small), kind, action, instance) {
                continue;
            }
            for big in sets.iter().filter(|b| small.is_subset(b)) {
                assert!(
                    evaluate(&subject("u1", big), kind, action, instance),
                    "{kind}/{action}: {small:?} allowed but {big:?} denied"
                );
            }
        }
    });
}

#[test]
fn missing_instance_fails_closed() {
    let user = Subject::new("u1").with_role("user");
    let moderator = Subject::new("u1").with_role("moderator");
    assert!(!evaluate(&user, ResourceKind::Task, Action::Update, None));
    assert!(!evaluate(&user, ResourceKind::Task, Action::Delete, None));
    assert!(!evaluate(&user, ResourceKind::Comment, Action::Update, None));
    assert!(!evaluate(&moderator, ResourceKind::Task, Action::Delete, None));
}

#[test]
fn owner_or_invited_may_update() {
    let t = task("u1", &[], false);
    let owner = Subject::new("u1").with_role("user");
    let other = Subject::new("u2").with_role("user");
    assert!(evaluate(&owner, ResourceKind::Task, Action::Update, Some(Instance::Task(&t))));
    assert!(!evaluate(&other, ResourceKind::Task, Action::Update, Some(Instance::Task(&t))));

    let invited = task("u1", &["u2"], false);
    assert!(evaluate(&other, ResourceKind::Task, Action::Update, Some(Instance::Task(&invited))));
}

#[test]
fn delete_requires_completion() {
    let owner = Subject::new("u1").with_role("user");
    let mut t = task("u1", &[], false);
    assert!(!evaluate(&owner, ResourceKind::Task, Action::Delete, Some(Instance::Task(&t))));
    t.completed = true;
    assert!(evaluate(&owner, ResourceKind::Task, Action::Delete, Some(Instance::Task(&t))));
}

#[test]
fn moderator_deletes_any_completed_task_only() {
    let m = Subject::new("m1").with_role("moderator");
    for t in tasks() {
        let got = evaluate(&m, ResourceKind::Task, Action::Delete, Some(Instance::Task(&t)));
        assert_eq!(got, t.completed, "task owned by {} completed={}", t.owner_id, t.completed);
    }
}

#[test]
fn admin_is_allowed_everything() {
    let sets = role_sets();
    each_case(|kind, action, instance| {
        for roles in sets.iter().filter(|r| r.contains(&Role::Admin)) {
            assert!(evaluate(&subject("zz", roles), kind, action, instance), "{kind}/{action}");
        }
    });
}

#[test]
fn only_authors_update_their_comments() {
    let a = Subject::new("a").with_role("user");
    let own = comment("a");
    let theirs = comment("b");
    assert!(evaluate(&a, ResourceKind::Comment, Action::Update, Some(Instance::Comment(&own))));
    assert!(!evaluate(&a, ResourceKind::Comment, Action::Update, Some(Instance::Comment(&theirs))));
}

#[test]
fn blocked_comments_are_hidden() {
    let v = Subject::new("v").with_role("user").blocked_by("author1");
    let blocked = comment("author1");
    let visible = comment("author2");
    assert!(!evaluate(&v, ResourceKind::Comment, Action::View, Some(Instance::Comment(&blocked))));
    assert!(evaluate(&v, ResourceKind::Comment, Action::View, Some(Instance::Comment(&visible))));
}

#[test]
fn decisions_are_repeatable_and_leave_inputs_untouched() {
    let sets = role_sets();
    let tasks = tasks();
    for roles in &sets {
        let s = subject("u1", roles);
        let before = s.clone();
        for t in &tasks {
            let snapshot = t.clone();
            for action in Action::ALL {
                let first = evaluate(&s, ResourceKind::Task, action, Some(Instance::Task(t)));
                for _ in 0..3 {
                    assert_eq!(first, evaluate(&s, ResourceKind::Task, action, Some(Instance::Task(t))));
                }
            }
            assert_eq!(&snapshot, t);
        }
        assert_eq!(before, s);
    }
}
