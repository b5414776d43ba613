use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(TaskId);

/// A stored task row. `id` and `created_at` are assigned by the remote
/// store on insert and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a task that does not exist remotely yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub text: String,
    pub completed: bool,
}

impl NewTask {
    pub fn pending(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_round_trips_through_json() {
        let raw = r#"{"id":3,"text":"water plants","completed":false,"created_at":"2024-01-01T08:30:00Z"}"#;
        let task: Task = serde_json::from_str(raw).expect("decode");
        assert_eq!(task.id, TaskId(3));
        assert_eq!(task.text, "water plants");
        assert!(!task.completed);

        let encoded = serde_json::to_string(&task).expect("encode");
        let back: Task = serde_json::from_str(&encoded).expect("decode again");
        assert_eq!(back, task);
    }

    #[test]
    fn pending_draft_is_not_completed() {
        let draft = NewTask::pending("buy milk");
        assert_eq!(draft.text, "buy milk");
        assert!(!draft.completed);
    }
}
