//! Text label identifiers.
//!
//! Labels are addressed by string ids coming back from the host page, so
//! ids are interned once and compared as integer keys afterwards.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

fn labels() -> &'static ThreadedRodeo {
    static LABELS: OnceLock<ThreadedRodeo> = OnceLock::new();
    LABELS.get_or_init(ThreadedRodeo::new)
}

/// Interned id of one text label.
///
/// Ids for labels that have since been removed stay interned; store
/// lookups with them simply miss.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct ElementId(Spur);

impl ElementId {
    pub fn intern(s: &str) -> Self {
        Self(labels().get_or_intern(s))
    }

    /// The id for `s` if one was ever interned. Use this for strings coming
    /// from outside the session so unknown ids do not grow the interner.
    pub fn lookup(s: &str) -> Option<Self> {
        labels().get(s).map(Self)
    }

    pub fn as_str(&self) -> &'static str {
        labels().resolve(&self.0)
    }

    /// Next id for a freshly placed label: `text_1`, `text_2`, …
    pub fn fresh_text() -> Self {
        Self::with_prefix("text")
    }

    /// Process-wide unique id `<prefix>_<n>`.
    pub fn with_prefix(prefix: &str) -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self::intern(&s)
    }
}

impl From<ElementId> for String {
    fn from(id: ElementId) -> Self {
        id.as_str().to_string()
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementId").field(&self.as_str()).finish()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
