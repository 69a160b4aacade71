use crate::semantics::{Role, Semantics};

/// Headless description of what a widget shows.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewKind {
    Row,
    Column,
    Text {
        text: String,
    },
    Button {
        label: String,
        enabled: bool,
    },
    TextField {
        name: String,
        text: String,
        enabled: bool,
    },
    /// Covers its siblings and swallows pointer input.
    Overlay,
}

#[derive(Clone, Debug, PartialEq)]
pub struct View {
    /// Optional stable key, used by tests and by callers diffing trees.
    pub key: Option<String>,
    pub kind: ViewKind,
    pub children: Vec<View>,
    pub semantics: Option<Semantics>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            key: None,
            kind,
            children: vec![],
            semantics: None,
        }
    }
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn child(mut self, kid: View) -> Self {
        self.children.push(kid);
        self
    }
    pub fn semantics(mut self, s: Semantics) -> Self {
        self.semantics = Some(s);
        self
    }

    /// Depth-first, parent before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a View)) {
        f(self);
        for c in &self.children {
            c.walk(f);
        }
    }

    pub fn find(&self, pred: impl Fn(&View) -> bool) -> Option<&View> {
        let mut found = None;
        self.walk(&mut |v| {
            if found.is_none() && pred(v) {
                found = Some(v);
            }
        });
        found
    }

    pub fn find_key(&self, key: &str) -> Option<&View> {
        self.find(|v| v.key.as_deref() == Some(key))
    }

    /// All `Text` contents in tree order.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |v| {
            if let ViewKind::Text { text } = &v.kind {
                out.push(text.as_str());
            }
        });
        out
    }

    /// Whether the node accepts input. Containers report their semantics
    /// flag and default to enabled.
    pub fn is_enabled(&self) -> bool {
        match &self.kind {
            ViewKind::Button { enabled, .. } | ViewKind::TextField { enabled, .. } => *enabled,
            ViewKind::Overlay => false,
            _ => self.semantics.as_ref().is_none_or(|s| s.enabled),
        }
    }

    pub fn has_overlay(&self) -> bool {
        self.children
            .iter()
            .any(|c| matches!(c.kind, ViewKind::Overlay))
    }

    pub fn role(&self) -> Role {
        match &self.semantics {
            Some(s) => s.role,
            None => match self.kind {
                ViewKind::Text { .. } => Role::Text,
                ViewKind::Button { .. } => Role::Button,
                ViewKind::TextField { .. } => Role::TextField,
                _ => Role::Container,
            },
        }
    }
}
