use crate::task::Task;
use mesg_service_core::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Write-once mapping from task name to [`Task`].
///
/// Registration takes the write lock once. Dispatch lookups share the read
/// lock and clone the task out, so no guard outlives the lookup.
#[derive(Debug, Default)]
pub(crate) struct TaskRegistry {
    tasks: RwLock<HashMap<String, Task>>,
}

impl TaskRegistry {
    /// Inserts `tasks` if and only if the registry is still empty.
    ///
    /// Duplicate names in `tasks` overwrite each other in order.
    pub(crate) fn register(&self, tasks: Vec<Task>) -> Result<()> {
        if tasks.is_empty() {
            return Err(Error::NoTasks);
        }

        let mut registry = self.tasks.write();
        if !registry.is_empty() {
            return Err(Error::AlreadyConfigured);
        }
        for task in tasks {
            registry.insert(task.name().to_owned(), task);
        }
        Ok(())
    }

    pub(crate) fn get(&self, name: &str) -> Option<Task> {
        self.tasks.read().get(name).cloned()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }

    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tasks.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Request, Response};
    use serde_json::json;

    fn first(_: &Request) -> Response {
        Response::Success(json!(1))
    }

    fn second(_: &Request) -> Response {
        Response::Success(json!(2))
    }

    fn request() -> Request {
        Request::from(mesg_service_core::proto::TaskData {
            execution_id: "e1".into(),
            task_key: "a".into(),
            input_data: "{}".into(),
        })
    }

    #[test]
    fn rejects_empty_registration() {
        let registry = TaskRegistry::default();
        assert!(matches!(registry.register(vec![]), Err(Error::NoTasks)));
        assert!(registry.names().is_empty());
    }

    #[test]
    fn second_registration_leaves_registry_unchanged() {
        let registry = TaskRegistry::default();
        registry
            .register(vec![Task::new("a", first), Task::new("b", first)])
            .unwrap();

        let err = registry.register(vec![Task::new("c", second)]).unwrap_err();
        assert!(matches!(err, Error::AlreadyConfigured));
        assert_eq!(registry.names(), ["a", "b"]);
        assert!(registry.get("c").is_none());
    }

    #[test]
    fn duplicate_names_last_write_wins() {
        let registry = TaskRegistry::default();
        registry
            .register(vec![Task::new("a", first), Task::new("a", second)])
            .unwrap();

        assert_eq!(registry.names(), ["a"]);
        let task = registry.get("a").unwrap();
        assert_eq!(task.handle(&request()), Response::Success(json!(2)));
    }

    #[test]
    fn concurrent_lookups_share_the_registry() {
        let registry = std::sync::Arc::new(TaskRegistry::default());
        registry.register(vec![Task::new("a", first)]).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = std::sync::Arc::clone(&registry);
                std::thread::spawn(move || registry.get("a").is_some())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
