#![allow(non_snake_case)]
//! Card entry widgets, layout and hit testing.
//!
//! Views are plain trees built by the functions below. [`layout`] runs them
//! through taffy, reports each node's box to its `on_layout` hook and returns
//! the clickable regions and scroll viewports of the pass.

pub mod card_view;
pub mod field;
pub mod focus;
pub mod form;
pub mod scroll;
pub mod textfield;

pub use card_view::{CardFace, CardOptions, CardPreview};
pub use field::{CardField, FieldProps, resolve_text_color};
pub use focus::{FocusHandles, Focusable, InputFocus};
pub use form::{CreditCardForm, FormConfig, FormMetrics, FormProps, FormStyles};
pub use scroll::{ScrollHandle, ScrollState};
pub use textfield::{TextEdit, TextInputState};

use std::rc::Rc;

use cardinput_core::*;
use taffy::prelude::{AvailableSpace, NodeId, TaffyTree};
use taffy::style::Style;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Default text size in px.
pub const FONT_PX: f32 = 16.0;
const LINE_HEIGHT: f32 = 1.3;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),
}

pub fn Box(modifier: Modifier) -> View {
    View::new(0, ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(0, ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(0, ViewKind::Column).modifier(modifier)
}

pub fn Text(text: impl Into<String>, style: TextStyle) -> View {
    View::new(
        0,
        ViewKind::Text {
            text: text.into(),
            style,
        },
    )
}

/// Scroll container around a single content view.
pub fn ScrollArea(modifier: Modifier, axis: Axis, scroll_enabled: bool, content: View) -> View {
    View::new(
        0,
        ViewKind::Scroll {
            axis,
            scroll_enabled,
        },
    )
    .modifier(modifier)
    .with_children(vec![content])
}

/// A clickable area found by the layout pass, in root coordinates before any
/// scrolling is applied.
#[derive(Clone)]
pub struct HitRegion {
    pub id: ViewId,
    pub rect: Rect,
    pub on_click: Callback,
    /// Index into [`LayoutPass::scrolls`] of the enclosing scroll container.
    pub scroll: Option<usize>,
}

impl std::fmt::Debug for HitRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRegion")
            .field("id", &self.id)
            .field("rect", &self.rect)
            .field("scroll", &self.scroll)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct ScrollViewport {
    pub id: ViewId,
    pub rect: Rect,
    pub axis: Axis,
    pub content: Size,
}

#[derive(Clone, Debug, Default)]
pub struct LayoutPass {
    pub size: Size,
    pub regions: Vec<HitRegion>,
    pub scrolls: Vec<ScrollViewport>,
}

impl LayoutPass {
    /// Topmost region under `p`. `offset_of` gives the current scroll offset
    /// of a scroll container by index.
    pub fn hit_test(&self, p: Vec2, offset_of: impl Fn(usize) -> f32) -> Option<&HitRegion> {
        self.regions.iter().rev().find(|r| match r.scroll {
            None => r.rect.contains(p),
            Some(i) => {
                let Some(sv) = self.scrolls.get(i) else {
                    return false;
                };
                if !sv.rect.contains(p) {
                    return false;
                }
                let off = offset_of(i);
                let q = match sv.axis {
                    Axis::Horizontal => Vec2 { x: p.x + off, y: p.y },
                    Axis::Vertical => Vec2 { x: p.x, y: p.y + off },
                };
                r.rect.contains(q)
            }
        })
    }
}

#[derive(Clone)]
enum NodeCtx {
    Text { graphemes: usize, font_px: f32 },
    Input { font_px: f32 },
    Container,
}

fn style_for(v: &View) -> Style {
    use taffy::prelude::*;
    let m = &v.modifier;
    let mut s = Style::default();

    s.display = Display::Flex;
    // children keep their size and overflow instead of shrinking
    s.flex_shrink = 0.0;
    s.flex_direction = match &v.kind {
        ViewKind::Row
        | ViewKind::Scroll {
            axis: cardinput_core::Axis::Horizontal,
            ..
        } => FlexDirection::Row,
        _ => FlexDirection::Column,
    };
    if let ViewKind::Scroll { axis, .. } = &v.kind {
        s.overflow = match axis {
            cardinput_core::Axis::Horizontal => taffy::geometry::Point {
                x: taffy::Overflow::Scroll,
                y: taffy::Overflow::Visible,
            },
            cardinput_core::Axis::Vertical => taffy::geometry::Point {
                x: taffy::Overflow::Visible,
                y: taffy::Overflow::Scroll,
            },
        };
    }

    if let Some(w) = m.width {
        s.size.width = length(w);
    } else if let Some(f) = m.width_fraction {
        s.size.width = percent(f);
    }
    if let Some(h) = m.height {
        s.size.height = length(h);
    }
    if let ViewKind::Text { style, .. } | ViewKind::TextInput { style, .. } = &v.kind
        && let Some(h) = style.height
    {
        s.size.height = length(h);
    }
    if let Some(p) = m.padding {
        s.padding = taffy::geometry::Rect {
            left: length(p.left),
            right: length(p.right),
            top: length(p.top),
            bottom: length(p.bottom),
        };
    }
    s.margin = taffy::geometry::Rect {
        left: length(m.margin_left.unwrap_or(0.0)),
        right: length(0.0),
        top: length(m.margin_top.unwrap_or(0.0)),
        bottom: length(0.0),
    };
    if m.center_children == Some(true) {
        s.align_items = Some(AlignItems::Center);
    }
    s
}

fn build_node(v: &View, t: &mut TaffyTree<NodeCtx>) -> Result<NodeId, UiError> {
    let style = style_for(v);
    let node = match &v.kind {
        ViewKind::Text { text, style: ts } => t.new_leaf_with_context(
            style,
            NodeCtx::Text {
                graphemes: text.graphemes(true).count(),
                font_px: ts.font_size.unwrap_or(FONT_PX),
            },
        )?,
        ViewKind::TextInput { style: ts, .. } => t.new_leaf_with_context(
            style,
            NodeCtx::Input {
                font_px: ts.font_size.unwrap_or(FONT_PX),
            },
        )?,
        _ => {
            let children = v
                .children
                .iter()
                .map(|c| build_node(c, t))
                .collect::<Result<Vec<_>, _>>()?;
            let n = t.new_with_children(style, &children)?;
            t.set_node_context(n, Some(NodeCtx::Container))?;
            n
        }
    };
    Ok(node)
}

/// Lays `root` out inside `viewport`, firing `on_layout` hooks with each
/// node's box relative to its parent.
pub fn layout(root: &View, viewport: Size) -> Result<LayoutPass, UiError> {
    let mut taffy: TaffyTree<NodeCtx> = TaffyTree::new();
    let root_node = build_node(root, &mut taffy)?;

    let mut rs = taffy.style(root_node)?.clone();
    rs.size.width = taffy::prelude::length(viewport.width);
    taffy.set_style(root_node, rs)?;

    let available = taffy::geometry::Size {
        width: AvailableSpace::Definite(viewport.width),
        height: AvailableSpace::Definite(viewport.height),
    };
    taffy.compute_layout_with_measure(root_node, available, |known, avail, _node, ctx, _style| {
        let (w, h) = match ctx {
            Some(NodeCtx::Text { graphemes, font_px }) => {
                // rough glyph-width estimate, no shaping
                (*graphemes as f32 * *font_px * 0.6, *font_px * LINE_HEIGHT)
            }
            Some(NodeCtx::Input { font_px }) => {
                let w = match avail.width {
                    AvailableSpace::Definite(w) => w,
                    _ => 0.0,
                };
                (w, *font_px * LINE_HEIGHT)
            }
            Some(NodeCtx::Container) | None => (0.0, 0.0),
        };
        taffy::geometry::Size {
            width: known.width.unwrap_or(w),
            height: known.height.unwrap_or(h),
        }
    })?;

    let root_rect = rect_of(&taffy, root_node)?;
    let mut pass = LayoutPass {
        size: root_rect.size(),
        ..LayoutPass::default()
    };
    let mut next_id = 1;
    collect(
        &taffy,
        root,
        root_node,
        Vec2::default(),
        None,
        &mut next_id,
        &mut pass,
    )?;
    log::trace!(
        "layout: {} hit regions, {} scroll containers",
        pass.regions.len(),
        pass.scrolls.len()
    );
    Ok(pass)
}

fn rect_of(t: &TaffyTree<NodeCtx>, node: NodeId) -> Result<Rect, UiError> {
    let l = t.layout(node)?;
    Ok(Rect {
        x: l.location.x,
        y: l.location.y,
        w: l.size.width,
        h: l.size.height,
    })
}

fn collect(
    t: &TaffyTree<NodeCtx>,
    v: &View,
    node: NodeId,
    origin: Vec2,
    scroll: Option<usize>,
    next_id: &mut ViewId,
    out: &mut LayoutPass,
) -> Result<(), UiError> {
    let local = rect_of(t, node)?;
    let abs = local.translate(origin.x, origin.y);
    let id = *next_id;
    *next_id += 1;

    if let Some(cb) = &v.modifier.on_layout {
        cb(local);
    }
    if let Some(cb) = &v.modifier.on_click {
        out.regions.push(HitRegion {
            id,
            rect: abs,
            on_click: Rc::clone(cb),
            scroll,
        });
    }

    let kids = t.children(node)?;
    let mut child_scroll = scroll;
    if let ViewKind::Scroll { axis, .. } = &v.kind {
        let pad_right = t.layout(node)?.padding.right;
        let pad_bottom = t.layout(node)?.padding.bottom;
        let mut content = Size::default();
        for k in &kids {
            let r = rect_of(t, *k)?;
            content.width = content.width.max(r.right() + pad_right);
            content.height = content.height.max(r.bottom() + pad_bottom);
        }
        out.scrolls.push(ScrollViewport {
            id,
            rect: abs,
            axis: *axis,
            content,
        });
        child_scroll = Some(out.scrolls.len() - 1);
    }

    for (cv, cn) in v.children.iter().zip(kids) {
        collect(
            t,
            cv,
            cn,
            Vec2 { x: abs.x, y: abs.y },
            child_scroll,
            next_id,
            out,
        )?;
    }
    Ok(())
}
