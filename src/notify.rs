//! Notifications surfaced after mutations (the page's toast messages).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// What kind of mutation a notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn past_tense(self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Update => "updated",
            MutationKind::Delete => "deleted",
        }
    }
}

/// A user-visible message about a finished mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub kind: MutationKind,
    pub resource: String,
    pub record_id: Option<String>,
    pub message: String,
}

impl Notice {
    pub fn success(kind: MutationKind, resource: &str, record_id: Option<&str>) -> Self {
        Self {
            level: NoticeLevel::Success,
            kind,
            resource: resource.to_string(),
            record_id: record_id.map(str::to_string),
            message: format!("{} {} successfully", singular(resource), kind.past_tense()),
        }
    }

    pub fn error(
        kind: MutationKind,
        resource: &str,
        record_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level: NoticeLevel::Error,
            kind,
            resource: resource.to_string(),
            record_id: record_id.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// "pick_lists" -> "Pick list"
fn singular(resource: &str) -> String {
    let words = resource.strip_suffix('s').unwrap_or(resource).replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

type Listener = Box<dyn Fn(&Notice) + Send + Sync>;

/// Synchronous notice dispatcher.
///
/// Listeners run on the emitting thread, in registration order: those
/// registered for the notice's level first, then those registered for all
/// notices. Clone-friendly via Arc; clones share listeners.
#[derive(Clone, Default)]
pub struct Notifier {
    by_level: Arc<RwLock<HashMap<NoticeLevel, Vec<Listener>>>>,
    any: Arc<RwLock<Vec<Listener>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for notices of one level.
    pub fn on<F>(&self, level: NoticeLevel, listener: F)
    where
        F: Fn(&Notice) + Send + Sync + 'static,
    {
        if let Ok(mut listeners) = self.by_level.write() {
            listeners.entry(level).or_default().push(Box::new(listener));
        }
    }

    /// Listen for every notice.
    pub fn on_any<F>(&self, listener: F)
    where
        F: Fn(&Notice) + Send + Sync + 'static,
    {
        if let Ok(mut listeners) = self.any.write() {
            listeners.push(Box::new(listener));
        }
    }

    pub fn emit(&self, notice: &Notice) {
        if let Ok(listeners) = self.by_level.read() {
            for listener in listeners.get(&notice.level).into_iter().flatten() {
                listener(notice);
            }
        }
        if let Ok(listeners) = self.any.read() {
            for listener in listeners.iter() {
                listener(notice);
            }
        }
    }
}
