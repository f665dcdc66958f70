use std::rc::Rc;

use crate::{Color, Rect};

pub type Callback = Rc<dyn Fn()>;
/// Receives a node's box relative to its parent after each layout pass.
pub type LayoutCallback = Rc<dyn Fn(Rect)>;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PaddingValues {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl PaddingValues {
    pub fn horizontal(v: f32) -> Self {
        Self {
            left: v,
            right: v,
            ..Self::default()
        }
    }

    pub fn all(v: f32) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }
}

/// Box-level style plus layout/click hooks.
///
/// Modifiers compose with [`Modifier::then`]: values set on the right-hand
/// side win, unset ones fall through. That is how caller overrides are merged
/// over a widget's base style.
#[derive(Clone, Default)]
pub struct Modifier {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub width_fraction: Option<f32>,
    pub padding: Option<PaddingValues>,
    pub margin_left: Option<f32>,
    pub margin_top: Option<f32>,
    pub background: Option<Color>,
    pub radius: Option<f32>,
    pub center_children: Option<bool>,
    pub on_layout: Option<LayoutCallback>,
    pub on_click: Option<Callback>,
}

impl std::fmt::Debug for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modifier")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("width_fraction", &self.width_fraction)
            .field("padding", &self.padding)
            .field("margin_left", &self.margin_left)
            .field("margin_top", &self.margin_top)
            .field("background", &self.background)
            .field("radius", &self.radius)
            .field("center_children", &self.center_children)
            .field("on_layout", &self.on_layout.as_ref().map(|_| "..."))
            .field("on_click", &self.on_click.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn width(mut self, w: f32) -> Self {
        self.width = Some(w);
        self
    }
    pub fn height(mut self, h: f32) -> Self {
        self.height = Some(h);
        self
    }
    pub fn size(self, w: f32, h: f32) -> Self {
        self.width(w).height(h)
    }
    pub fn fill_max_width(mut self) -> Self {
        self.width_fraction = Some(1.0);
        self
    }
    pub fn padding(mut self, v: f32) -> Self {
        self.padding = Some(PaddingValues::all(v));
        self
    }
    pub fn padding_values(mut self, padding: PaddingValues) -> Self {
        self.padding = Some(padding);
        self
    }
    pub fn margin_left(mut self, v: f32) -> Self {
        self.margin_left = Some(v);
        self
    }
    pub fn margin_top(mut self, v: f32) -> Self {
        self.margin_top = Some(v);
        self
    }
    pub fn background(mut self, c: Color) -> Self {
        self.background = Some(c);
        self
    }
    pub fn clip_rounded(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }
    pub fn center_children(mut self) -> Self {
        self.center_children = Some(true);
        self
    }
    pub fn on_layout(mut self, f: impl Fn(Rect) + 'static) -> Self {
        self.on_layout = Some(Rc::new(f));
        self
    }
    pub fn clickable(mut self, f: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }

    /// Layers `other` on top of `self`.
    pub fn then(self, other: &Modifier) -> Modifier {
        Modifier {
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            width_fraction: other.width_fraction.or(self.width_fraction),
            padding: other.padding.or(self.padding),
            margin_left: other.margin_left.or(self.margin_left),
            margin_top: other.margin_top.or(self.margin_top),
            background: other.background.or(self.background),
            radius: other.radius.or(self.radius),
            center_children: other.center_children.or(self.center_children),
            on_layout: other.on_layout.clone().or(self.on_layout),
            on_click: other.on_click.clone().or(self.on_click),
        }
    }
}

/// Text-level style. Merges like [`Modifier`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextStyle {
    pub color: Option<Color>,
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub height: Option<f32>,
    pub font_family: Option<String>,
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn color(mut self, c: Color) -> Self {
        self.color = Some(c);
        self
    }
    pub fn font_size(mut self, px: f32) -> Self {
        self.font_size = Some(px);
        self
    }
    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }
    pub fn height(mut self, h: f32) -> Self {
        self.height = Some(h);
        self
    }
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn then(self, other: &TextStyle) -> TextStyle {
        TextStyle {
            color: other.color.or(self.color),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            height: other.height.or(self.height),
            font_family: other.font_family.clone().or(self.font_family),
        }
    }
}
