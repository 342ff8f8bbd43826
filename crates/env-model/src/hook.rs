//! Lifecycle hooks
//!
//! A hook lists the tasks to run before and after a lifecycle event. Merging
//! layers appends the more specific layer's tasks after the inherited ones,
//! without reordering or deduplication.

use serde::Serialize;

use crate::collection::Merge;
use crate::record::{EnvironmentHooksRecord, HookRecord};
use crate::task::TaskRef;
use crate::validation::{Children, Traversable};

/// Tasks run around one lifecycle event
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hook {
    pub before: Vec<TaskRef>,
    pub after: Vec<TaskRef>,
}

impl Hook {
    pub fn from_record(record: &HookRecord) -> Self {
        Self {
            before: record.before.iter().map(TaskRef::from_record).collect(),
            after: record.after.iter().map(TaskRef::from_record).collect(),
        }
    }

    /// Whether no task is attached
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    /// Every referenced task, before then after
    pub fn tasks(&self) -> impl Iterator<Item = &TaskRef> {
        self.before.iter().chain(&self.after)
    }

    /// Record `descriptor` as the origin of every task not yet attributed.
    pub fn set_origin(&mut self, descriptor: &str) {
        for task in self.before.iter_mut().chain(&mut self.after) {
            if task.origin.is_empty() {
                task.origin = descriptor.to_string();
            }
        }
    }
}

impl Merge for Hook {
    /// Append `overlay`'s before and after lists to ours.
    ///
    /// A hook cannot be merged with itself: `&mut self` and `&Self` never
    /// alias, so recursive resolution cannot double a hook's tasks.
    fn merge(&mut self, overlay: &Self) {
        self.before.extend(overlay.before.iter().cloned());
        self.after.extend(overlay.after.iter().cloned());
    }
}

impl Traversable for Hook {
    fn children(&self) -> Children<'_> {
        Children::Keyed(vec![
            ("before", &self.before as &dyn Traversable),
            ("after", &self.after as &dyn Traversable),
        ])
    }
}

/// Hooks of the environment lifecycle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvironmentHooks {
    pub init: Hook,
    pub create: Hook,
    pub install: Hook,
    pub deploy: Hook,
    pub delete: Hook,
}

impl EnvironmentHooks {
    pub fn from_record(record: &EnvironmentHooksRecord) -> Self {
        Self {
            init: Hook::from_record(&record.init),
            create: Hook::from_record(&record.create),
            install: Hook::from_record(&record.install),
            deploy: Hook::from_record(&record.deploy),
            delete: Hook::from_record(&record.delete),
        }
    }

    pub fn set_origin(&mut self, descriptor: &str) {
        for hook in [
            &mut self.init,
            &mut self.create,
            &mut self.install,
            &mut self.deploy,
            &mut self.delete,
        ] {
            hook.set_origin(descriptor);
        }
    }
}

impl Merge for EnvironmentHooks {
    fn merge(&mut self, overlay: &Self) {
        self.init.merge(&overlay.init);
        self.create.merge(&overlay.create);
        self.install.merge(&overlay.install);
        self.deploy.merge(&overlay.deploy);
        self.delete.merge(&overlay.delete);
    }
}

impl Traversable for EnvironmentHooks {
    fn children(&self) -> Children<'_> {
        Children::Keyed(vec![
            ("init", &self.init as &dyn Traversable),
            ("create", &self.create as &dyn Traversable),
            ("install", &self.install as &dyn Traversable),
            ("deploy", &self.deploy as &dyn Traversable),
            ("delete", &self.delete as &dyn Traversable),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hook(before: &[&str], after: &[&str]) -> Hook {
        Hook {
            before: before.iter().map(|t| TaskRef::new(*t)).collect(),
            after: after.iter().map(|t| TaskRef::new(*t)).collect(),
        }
    }

    fn names(refs: &[TaskRef]) -> Vec<&str> {
        refs.iter().map(|r| r.task.as_str()).collect()
    }

    #[test]
    fn test_merge_appends_in_order() {
        let mut base = hook(&["b1", "b2"], &["a1"]);
        let overlay = hook(&["b3"], &["a2", "a1"]);

        base.merge(&overlay);

        assert_eq!(names(&base.before), vec!["b1", "b2", "b3"]);
        assert_eq!(names(&base.after), vec!["a1", "a2", "a1"]);
    }

    #[test]
    fn test_set_origin_keeps_existing_attribution() {
        let mut hook = hook(&["b1"], &["a1"]);
        hook.before[0].origin = "base".to_string();

        hook.set_origin("root");

        assert_eq!(hook.before[0].origin, "base");
        assert_eq!(hook.after[0].origin, "root");
    }

    #[test]
    fn test_merge_with_empty_overlay_is_noop() {
        let mut base = hook(&["b1"], &["a1"]);
        let before = base.clone();
        base.merge(&Hook::default());
        assert_eq!(base, before);
    }
}
