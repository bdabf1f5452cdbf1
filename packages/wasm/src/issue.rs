//! The issue contract consumed from the host application.
//!
//! Only the fields the cluster view needs are modelled. Issues are immutable
//! here; the view keeps them in an [`IssueIndex`] keyed by issue number and
//! cluster nodes refer to them by id.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Issue identifier (the issue number on the host platform).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub u64);

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A label attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color, with or without a leading `#`.
    pub color: String,
}

/// Comment connection summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comments {
    pub total_count: u32,
}

/// An open issue as delivered by the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: IssueId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub comments: Comments,
}

impl Issue {
    /// The label that decides this issue's cluster.
    pub fn primary_label(&self) -> Option<&Label> {
        self.labels.first()
    }

    pub fn comment_count(&self) -> u32 {
        self.comments.total_count
    }
}

/// Normalize a label color to `#rrggbb` form.
///
/// The host platform reports label colors as bare hex (`d73a4a`).
pub fn normalize_color(color: &str) -> String {
    let color = color.trim();
    if color.starts_with('#') {
        color.to_ascii_lowercase()
    } else {
        format!("#{}", color.to_ascii_lowercase())
    }
}

/// Issues addressable by id.
///
/// Cloning is cheap: entries are shared, so a node's issue always resolves to
/// the very issue the host handed in.
#[derive(Debug, Clone, Default)]
pub struct IssueIndex {
    order: Vec<IssueId>,
    by_id: HashMap<IssueId, Rc<Issue>>,
}

impl IssueIndex {
    pub fn new(issues: impl IntoIterator<Item = Issue>) -> Self {
        Self::from_shared(issues.into_iter().map(Rc::new))
    }

    /// Build from already shared issues. Later duplicates of an id are ignored.
    pub fn from_shared(issues: impl IntoIterator<Item = Rc<Issue>>) -> Self {
        let mut index = Self::default();
        for issue in issues {
            index.insert_if_absent(issue);
        }
        index
    }

    /// Insert an issue unless one with the same id is present.
    ///
    /// Returns true if the issue was inserted.
    pub fn insert_if_absent(&mut self, issue: Rc<Issue>) -> bool {
        if self.by_id.contains_key(&issue.number) {
            return false;
        }
        self.order.push(issue.number);
        self.by_id.insert(issue.number, issue);
        true
    }

    pub fn get(&self, id: IssueId) -> Option<&Rc<Issue>> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: IssueId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Issues in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Issue>> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
