use std::sync::Arc;

use serde::Serialize;
use taskgate_core::error::{Result, TaskGateError};
use taskgate_core::policy::decide;
use taskgate_core::{Action, Comment, Instance, ResourceKind, Subject, Task};

use crate::obs::metrics::GatewayMetrics;

/// The one place handlers ask the engine for a verdict.
///
/// Both "should this control render enabled" and "may this request proceed"
/// go through here, so they cannot disagree.
#[derive(Clone)]
pub struct Guard {
    metrics: Arc<GatewayMetrics>,
}

impl Guard {
    pub fn new(metrics: Arc<GatewayMetrics>) -> Self {
        Self { metrics }
    }

    /// Verdict as a bool, recorded in logs and metrics.
    pub fn allows(
        &self,
        subject: &Subject,
        kind: ResourceKind,
        action: Action,
        instance: Option<Instance<'_>>,
    ) -> bool {
        let d = decide(subject, kind, action, instance);
        let verdict = if d.allowed { "allow" } else { "deny" };
        self.metrics.policy_decisions.inc(&[
            ("kind", kind.as_str()),
            ("action", action.as_str()),
            ("verdict", verdict),
        ]);
        tracing::debug!(
            subject = %subject.id,
            %kind,
            %action,
            instance = instance.map(instance_id).unwrap_or("-"),
            verdict,
            granted_by = d.granted_by.as_ref().map(|r| r.as_str()).unwrap_or("-"),
            "policy decision"
        );
        d.allowed
    }

    /// `Ok(())` on allow, `NotAllowed` on deny. Run before any mutation.
    pub fn authorize(
        &self,
        subject: &Subject,
        kind: ResourceKind,
        action: Action,
        instance: Option<Instance<'_>>,
    ) -> Result<()> {
        if self.allows(subject, kind, action, instance) {
            Ok(())
        } else {
            Err(TaskGateError::NotAllowed(format!("{action} {kind}")))
        }
    }

    pub fn task_capabilities(&self, subject: &Subject, task: &Task) -> Capabilities {
        let inst = Some(Instance::Task(task));
        Capabilities {
            view: self.allows(subject, ResourceKind::Task, Action::View, inst),
            update: self.allows(subject, ResourceKind::Task, Action::Update, inst),
            delete: self.allows(subject, ResourceKind::Task, Action::Delete, inst),
        }
    }

    pub fn comment_capabilities(&self, subject: &Subject, comment: &Comment) -> Capabilities {
        let inst = Some(Instance::Comment(comment));
        Capabilities {
            view: self.allows(subject, ResourceKind::Comment, Action::View, inst),
            update: self.allows(subject, ResourceKind::Comment, Action::Update, inst),
            delete: self.allows(subject, ResourceKind::Comment, Action::Delete, inst),
        }
    }
}

/// Per-instance verdicts shipped alongside a resource for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub view: bool,
    pub update: bool,
    pub delete: bool,
}

fn instance_id<'a>(i: Instance<'a>) -> &'a str {
    match i {
        Instance::Task(t) => &t.id,
        Instance::Comment(c) => &c.id,
    }
}
