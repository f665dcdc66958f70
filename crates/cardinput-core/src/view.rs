use std::collections::BTreeMap;

use crate::{Axis, Color, Modifier, TextStyle};

pub type ViewId = u64;

/// Extra options for a platform text input, passed through untouched.
pub type InputProps = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyboardType {
    #[default]
    Default,
    Numeric,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AutoCapitalize {
    None,
    #[default]
    Words,
    Characters,
}

#[derive(Clone, Debug)]
pub enum ViewKind {
    Box,
    Row,
    Column,
    Scroll {
        axis: Axis,
        /// User drags; programmatic scrolling works either way.
        scroll_enabled: bool,
    },
    Text {
        text: String,
        style: TextStyle,
    },
    TextInput {
        value: String,
        placeholder: String,
        placeholder_color: Option<Color>,
        style: TextStyle,
        keyboard: KeyboardType,
        auto_capitalize: AutoCapitalize,
        auto_correct: bool,
        focused: bool,
        extra: InputProps,
    },
}

#[derive(Clone, Debug)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub modifier: Modifier,
    pub children: Vec<View>,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            modifier: Modifier::default(),
            children: vec![],
        }
    }
    pub fn modifier(mut self, m: Modifier) -> Self {
        self.modifier = m;
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

    /// Pre-order walk.
    pub fn visit(&self, f: &mut impl FnMut(&View)) {
        f(self);
        for c in &self.children {
            c.visit(f);
        }
    }

    /// Concatenated text of every `Text` node, one per line. Handy for
    /// asserting what a subtree shows.
    pub fn text_content(&self) -> String {
        let mut lines = Vec::new();
        self.visit(&mut |v| {
            if let ViewKind::Text { text, .. } = &v.kind {
                lines.push(text.clone());
            }
        });
        lines.join("\n")
    }
}
