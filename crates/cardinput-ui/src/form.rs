//! # Credit card form
//!
//! `CreditCardForm` owns the visible fields, their focus handles, the last
//! measured box of every field and the horizontal scroll container. It never
//! owns values or statuses: those arrive in a [`FormSnapshot`] on every
//! [`update`](CreditCardForm::update) and user intent leaves through the
//! [`FormCallbacks`], untouched.
//!
//! Focus is driven from outside. On [`mount`](CreditCardForm::mount), and on
//! every update whose `focused` differs from the previous one, the form
//! focuses the target field and scrolls so the field before it peeks in from
//! the left. Focus and scroll are independent and both best-effort: a field
//! without a handle is not focused, a field that has not been measured yet is
//! not scrolled to, and neither is retried later.
//!
//! ```rust
//! use cardinput_core::*;
//! use cardinput_ui::{CreditCardForm, FormConfig, FormProps};
//!
//! let props = FormProps {
//!     snapshot: FormSnapshot {
//!         focused: Some(FieldId::Number),
//!         ..FormSnapshot::default()
//!     },
//!     callbacks: FormCallbacks::new(),
//! };
//! let mut form = CreditCardForm::new(FormConfig::default(), props);
//! form.mount();
//! assert_eq!(form.visible_fields().as_slice(), &[FieldId::Number, FieldId::Expiry, FieldId::Cvc]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use cardinput_core::*;
use smallvec::SmallVec;

use crate::card_view::{CardOptions, CardPreview};
use crate::field::{CardField, FieldProps};
use crate::focus::{FocusHandles, InputFocus};
use crate::scroll::{ScrollHandle, ScrollState};
use crate::textfield::TextEdit;
use crate::{Column, LayoutPass, Row, ScrollArea};

/// Fixed layout constants, built once per form.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct FormMetrics {
    pub window_width: f32,
    pub cvc_input_width: f32,
    pub expiry_input_width: f32,
    pub card_number_width_offset: f32,
    pub postal_code_input_width: f32,
    /// How much of the previous field stays visible after scrolling.
    pub previous_field_offset: f32,
    pub field_margin_left: f32,
    pub form_padding_x: f32,
    pub form_margin_top: f32,
    pub input_height: f32,
}

impl Default for FormMetrics {
    fn default() -> Self {
        Self {
            window_width: 375.0,
            cvc_input_width: 70.0,
            expiry_input_width: 70.0,
            card_number_width_offset: 40.0,
            postal_code_input_width: 120.0,
            previous_field_offset: 40.0,
            field_margin_left: 10.0,
            form_padding_x: 10.0,
            form_margin_top: 20.0,
            input_height: 40.0,
        }
    }
}

impl FormMetrics {
    pub fn for_window(width: f32) -> Self {
        Self {
            window_width: width,
            ..Self::default()
        }
    }

    /// Shared by the number and name fields.
    pub fn card_number_input_width(&self) -> f32 {
        self.window_width - self.expiry_input_width - self.card_number_width_offset
    }

    pub fn field_width(&self, field: FieldId) -> f32 {
        match field {
            FieldId::Number | FieldId::Name => self.card_number_input_width(),
            FieldId::Expiry => self.expiry_input_width,
            FieldId::Cvc => self.cvc_input_width,
            FieldId::PostalCode => self.postal_code_input_width,
        }
    }
}

/// Caller overrides, merged over the form's base styles.
#[derive(Clone, Debug, Default)]
pub struct FormStyles {
    pub input_container: Modifier,
    pub input: TextStyle,
    pub label: TextStyle,
}

#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct FormConfig {
    pub requires_name: bool,
    #[cfg_attr(feature = "serde", serde(rename = "requiresCVC"))]
    pub requires_cvc: bool,
    pub requires_postal_code: bool,
    /// Lets the user drag the field strip. Programmatic scrolling ignores it.
    pub allow_scroll: bool,
    pub horizontal_scroll: bool,

    pub labels: FieldMap<String>,
    pub placeholders: FieldMap<String>,

    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "cardinput_core::color::optional_token::deserialize")
    )]
    pub valid_color: Option<Color>,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "cardinput_core::color::optional_token::deserialize")
    )]
    pub invalid_color: Option<Color>,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "cardinput_core::color::optional_token::deserialize")
    )]
    pub placeholder_color: Option<Color>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub styles: FormStyles,
    pub input_props: FieldMap<InputProps>,
    pub metrics: FormMetrics,
    pub card: CardOptions,
}

impl Default for FormConfig {
    fn default() -> Self {
        let labels = FieldMap::new()
            .with(FieldId::Number, "CARD NUMBER".to_string())
            .with(FieldId::Expiry, "EXPIRY".to_string())
            .with(FieldId::Cvc, "CVC/CCV".to_string())
            .with(FieldId::Name, "CARDHOLDER'S NAME".to_string())
            .with(FieldId::PostalCode, "POSTAL CODE".to_string());
        let placeholders = FieldMap::new()
            .with(FieldId::Number, "1234 5678 1234 5678".to_string())
            .with(FieldId::Expiry, "MM/YY".to_string())
            .with(FieldId::Cvc, "CVC".to_string())
            .with(FieldId::Name, "Full Name".to_string())
            .with(FieldId::PostalCode, "34567".to_string());
        Self {
            requires_name: false,
            requires_cvc: true,
            requires_postal_code: false,
            allow_scroll: false,
            horizontal_scroll: true,
            labels,
            placeholders,
            valid_color: None,
            invalid_color: Some(Color::RED),
            placeholder_color: Some(Color::GRAY),
            styles: FormStyles::default(),
            input_props: FieldMap::new(),
            metrics: FormMetrics::default(),
            card: CardOptions::default(),
        }
    }
}

/// What the State Provider hands the form on every render.
#[derive(Clone, Debug, Default)]
pub struct FormProps {
    pub snapshot: FormSnapshot,
    pub callbacks: FormCallbacks,
}

impl FormProps {
    pub fn from_provider<P: StateProvider + ?Sized>(provider: &P) -> Self {
        Self {
            snapshot: provider.snapshot(),
            callbacks: provider.callbacks(),
        }
    }
}

pub struct CreditCardForm {
    config: FormConfig,
    props: FormProps,
    fields: FieldMap<CardField>,
    handles: FocusHandles,
    layouts: Rc<RefCell<FieldMap<Rect>>>,
    scroll: Rc<dyn ScrollHandle>,
    scroll_state: Rc<ScrollState>,
    input_focus: InputFocus,
    last_pass: Option<LayoutPass>,
    mounted: bool,
}

impl CreditCardForm {
    pub fn new(config: FormConfig, props: FormProps) -> Self {
        Self::with_clock(config, props, Rc::new(SystemClock))
    }

    pub fn with_clock(config: FormConfig, props: FormProps, clock: Rc<dyn Clock>) -> Self {
        let axis = if config.horizontal_scroll {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let scroll_state = Rc::new(ScrollState::with_clock(axis, clock));
        scroll_state.set_scroll_enabled(config.allow_scroll);
        let mut form = Self {
            config,
            props,
            fields: FieldMap::new(),
            handles: FocusHandles::new(),
            layouts: Rc::new(RefCell::new(FieldMap::new())),
            scroll: scroll_state.clone(),
            scroll_state,
            input_focus: InputFocus::new(),
            last_pass: None,
            mounted: false,
        };
        form.reconcile();
        form
    }

    /// Sends programmatic scrolls somewhere other than the built-in
    /// container.
    pub fn with_scroll_handle(mut self, handle: Rc<dyn ScrollHandle>) -> Self {
        self.scroll = handle;
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn props(&self) -> &FormProps {
        &self.props
    }

    /// Focuses the initial target. Later calls do nothing.
    pub fn mount(&mut self) {
        if self.mounted {
            log::debug!("form already mounted");
            return;
        }
        self.mounted = true;
        if let Some(target) = self.props.snapshot.focused {
            self.focus(target);
        }
    }

    /// Applies a new snapshot. Refocuses when the focus target changed.
    pub fn update(&mut self, props: FormProps) {
        let prev = self.props.snapshot.focused;
        self.props = props;
        self.reconcile();
        let next = self.props.snapshot.focused;
        if self.mounted
            && next != prev
            && let Some(target) = next
        {
            self.focus(target);
        }
    }

    /// Swaps the configuration, creating or dropping fields whose flags
    /// changed. Layout records of dropped fields are kept.
    pub fn reconfigure(&mut self, config: FormConfig) {
        self.scroll_state.set_scroll_enabled(config.allow_scroll);
        if config.horizontal_scroll != self.config.horizontal_scroll {
            log::warn!("horizontal_scroll cannot change after creation; keeping the current axis");
        }
        let horizontal = self.config.horizontal_scroll;
        self.config = FormConfig {
            horizontal_scroll: horizontal,
            ..config
        };
        self.reconcile();
    }

    /// Fields to render, in display and advance order.
    pub fn visible_fields(&self) -> SmallVec<[FieldId; 5]> {
        let c = &self.config;
        let mut out = SmallVec::new();
        out.push(FieldId::Number);
        out.push(FieldId::Expiry);
        if c.requires_cvc {
            out.push(FieldId::Cvc);
        }
        if c.requires_name {
            out.push(FieldId::Name);
        }
        if c.requires_postal_code {
            out.push(FieldId::PostalCode);
        }
        out
    }

    fn reconcile(&mut self) {
        let visible = self.visible_fields();
        for id in FieldId::ALL {
            if visible.contains(&id) {
                continue;
            }
            if self.fields.remove(id).is_some() {
                self.handles.deregister(id);
                if self.input_focus.is(id) {
                    self.input_focus.set(None);
                }
                // hit regions of the old pass still point at the dropped field
                self.last_pass = None;
                log::trace!("{id}: field removed");
            }
        }
        for &id in &visible {
            let props = self.field_props(id);
            match self.fields.get_mut(id) {
                Some(field) => field.update(props),
                None => {
                    let field = CardField::new(props, self.input_focus.clone());
                    self.handles.register(id, field.handle());
                    self.fields.insert(id, field);
                    log::trace!("{id}: field created");
                }
            }
        }
    }

    /// Container modifier for one field under the width policy.
    pub fn container_modifier(&self, field: FieldId) -> Modifier {
        let m = &self.config.metrics;
        let mut base = Modifier::new().fill_max_width();
        if self.config.horizontal_scroll {
            base = base
                .margin_left(m.field_margin_left)
                .width(m.field_width(field));
        }
        base.then(&self.config.styles.input_container)
    }

    pub fn field_props(&self, field: FieldId) -> FieldProps {
        let c = &self.config;
        let snap = &self.props.snapshot;
        let layouts = self.layouts.clone();
        let on_layout: LayoutCallback = Rc::new(move |rect| {
            log::trace!("{field}: measured at {rect:?}");
            layouts.borrow_mut().insert(field, rect);
        });
        FieldProps {
            field,
            label: c.labels.get(field).cloned().unwrap_or_default(),
            value: snap.value(field).to_string(),
            placeholder: c.placeholders.get(field).cloned().unwrap_or_default(),
            status: snap.status(field),
            keyboard: if field.is_numeric() {
                KeyboardType::Numeric
            } else {
                KeyboardType::Default
            },
            container: self.container_modifier(field),
            input_style: TextStyle::new()
                .height(c.metrics.input_height)
                .then(&c.styles.input),
            label_style: TextStyle::new().bold().then(&c.styles.label),
            valid_color: c.valid_color,
            invalid_color: c.invalid_color,
            placeholder_color: c.placeholder_color,
            on_layout: Some(on_layout),
            callbacks: self.props.callbacks.clone(),
            input_props: c.input_props.get(field).cloned().unwrap_or_default(),
        }
    }

    /// Records a measured box for `field`, replacing any earlier one.
    pub fn on_field_layout(&self, field: FieldId, rect: Rect) {
        self.layouts.borrow_mut().insert(field, rect);
    }

    pub fn layout_record(&self, field: FieldId) -> Option<Rect> {
        self.layouts.borrow().get(field).copied()
    }

    pub fn field(&self, field: FieldId) -> Option<&CardField> {
        self.fields.get(field)
    }

    pub fn scroll_state(&self) -> &Rc<ScrollState> {
        &self.scroll_state
    }

    /// Field currently holding input focus.
    pub fn focused_input(&self) -> Option<FieldId> {
        self.input_focus.get()
    }

    pub fn preview(&self) -> CardPreview {
        CardPreview::from_snapshot(
            &self.props.snapshot,
            self.config.requires_name,
            self.config.card.clone(),
        )
    }

    pub fn view(&self) -> View {
        let c = &self.config;
        let m = &c.metrics;
        let axis = if c.horizontal_scroll {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let fields: Vec<View> = self
            .visible_fields()
            .iter()
            .filter_map(|&id| self.fields.get(id))
            .map(CardField::view)
            .collect();
        let padding = Modifier::new().padding_values(PaddingValues::horizontal(m.form_padding_x));
        let content = if c.horizontal_scroll {
            Row(padding)
        } else {
            Column(padding)
        }
        .with_children(fields);

        Column(Modifier::new()).with_children(vec![
            self.preview().view(),
            ScrollArea(
                Modifier::new().margin_top(m.form_margin_top),
                axis,
                c.allow_scroll,
                content,
            ),
        ])
    }

    /// Runs a layout pass, capturing field boxes and the scroll extents.
    /// A failed pass is logged and leaves the previous state in place.
    pub fn layout(&mut self, viewport: Size) -> Option<&LayoutPass> {
        let pass = match crate::layout(&self.view(), viewport) {
            Ok(pass) => pass,
            Err(e) => {
                log::warn!("form layout skipped: {e}");
                return self.last_pass.as_ref();
            }
        };
        if let Some(sv) = pass.scrolls.first() {
            let axis = self.scroll_state.axis();
            self.scroll_state.set_viewport(axis.extent(sv.rect.size()));
            self.scroll_state.set_content(axis.extent(sv.content));
        }
        self.last_pass = Some(pass);
        self.last_pass.as_ref()
    }

    /// Delivers a tap in root coordinates. Returns whether anything took it.
    pub fn tap(&self, p: Vec2) -> bool {
        let Some(pass) = &self.last_pass else {
            log::debug!("tap before first layout ignored");
            return false;
        };
        let offset = self.scroll_state.get();
        match pass.hit_test(p, |_| offset) {
            Some(region) => {
                (region.on_click)();
                true
            }
            None => false,
        }
    }

    /// Routes a keystroke to the focused input.
    pub fn key(&self, edit: TextEdit) -> bool {
        let Some(field) = self.input_focus.get().and_then(|id| self.fields.get(id)) else {
            log::trace!("keystroke with no focused input dropped");
            return false;
        };
        field.edit(edit);
        true
    }

    pub fn next_field(&self, field: FieldId) -> Option<FieldId> {
        let visible = self.visible_fields();
        let i = visible.iter().position(|&f| f == field)?;
        visible.get(i + 1).copied()
    }

    pub fn previous_field(&self, field: FieldId) -> Option<FieldId> {
        let visible = self.visible_fields();
        let i = visible.iter().position(|&f| f == field)?;
        i.checked_sub(1).map(|j| visible[j])
    }

    /// Moves focus to the field after the current one. Returns the new
    /// target, or `None` on the last field.
    pub fn advance_focus(&mut self) -> Option<FieldId> {
        let current = self.input_focus.get().or(self.props.snapshot.focused)?;
        let next = self.next_field(current)?;
        self.focus(next);
        Some(next)
    }

    /// Advances a running scroll animation.
    pub fn tick(&self) -> bool {
        self.scroll_state.tick()
    }

    fn focus(&self, target: FieldId) {
        log::debug!("focusing {target}");
        self.handles.focus(target);
        let record = self.layout_record(target);
        match record {
            Some(r) => {
                let x = (r.x - self.config.metrics.previous_field_offset).max(0.0);
                log::debug!("scrolling to x={x} for {target}");
                self.scroll.scroll_to(x, true);
            }
            None => log::debug!("{target} not measured yet; skipping scroll"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    type Log = Rc<RefCell<Vec<String>>>;

    fn callbacks() -> (FormCallbacks, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let push = |tag: &'static str| {
            let log = log.clone();
            move |f: FieldId| log.borrow_mut().push(format!("{tag}:{f}"))
        };
        let cbs = FormCallbacks::new()
            .on_focus(push("focus"))
            .on_become_empty(push("become_empty"))
            .on_become_valid(push("become_valid"))
            .on_change({
                let log = log.clone();
                move |f, v| log.borrow_mut().push(format!("change:{f}:{v}"))
            });
        (cbs, log)
    }

    fn props(focused: Option<FieldId>, cbs: &FormCallbacks) -> FormProps {
        FormProps {
            snapshot: FormSnapshot {
                focused,
                ..FormSnapshot::default()
            },
            callbacks: cbs.clone(),
        }
    }

    #[derive(Default)]
    struct RecordingScroll {
        calls: RefCell<Vec<(f32, bool)>>,
    }

    impl ScrollHandle for RecordingScroll {
        fn scroll_to(&self, x: f32, animated: bool) {
            self.calls.borrow_mut().push((x, animated));
        }
    }

    fn viewport() -> Size {
        Size {
            width: 375.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_visible_fields_follow_flags() {
        let config = FormConfig {
            requires_cvc: false,
            requires_name: true,
            requires_postal_code: false,
            ..FormConfig::default()
        };
        let form = CreditCardForm::new(config, FormProps::default());
        insta::assert_snapshot!(format!("{:?}", form.visible_fields()), @"[Number, Expiry, Name]");

        let all = FormConfig {
            requires_name: true,
            requires_postal_code: true,
            ..FormConfig::default()
        };
        let form = CreditCardForm::new(all, FormProps::default());
        assert_eq!(form.visible_fields().as_slice(), &FieldId::ALL);
    }

    #[test]
    fn test_mount_focuses_initial_target_once() {
        let (cbs, log) = callbacks();
        let mut form = CreditCardForm::new(FormConfig::default(), props(Some(FieldId::Cvc), &cbs));
        form.mount();
        form.mount();
        assert_eq!(*log.borrow(), vec!["focus:cvc".to_string()]);
        assert_eq!(form.focused_input(), Some(FieldId::Cvc));
    }

    #[test]
    fn test_mount_without_target_does_nothing() {
        let (cbs, log) = callbacks();
        let scroll = Rc::new(RecordingScroll::default());
        let mut form = CreditCardForm::new(FormConfig::default(), props(None, &cbs))
            .with_scroll_handle(scroll.clone());
        form.on_field_layout(FieldId::Number, Rect::new(20.0, 0.0, 265.0, 60.0));
        form.mount();
        assert!(log.borrow().is_empty());
        assert!(scroll.calls.borrow().is_empty());
    }

    #[test]
    fn test_focus_change_refocuses_only_new_target() {
        let (cbs, log) = callbacks();
        let config = FormConfig {
            requires_name: true,
            ..FormConfig::default()
        };
        let mut form = CreditCardForm::new(config, props(Some(FieldId::Number), &cbs));
        form.mount();
        form.update(props(Some(FieldId::Name), &cbs));
        form.update(props(Some(FieldId::Name), &cbs));
        assert_eq!(
            *log.borrow(),
            vec!["focus:number".to_string(), "focus:name".to_string()]
        );
    }

    #[test]
    fn test_scroll_keeps_previous_field_in_view() {
        let (cbs, _log) = callbacks();
        let scroll = Rc::new(RecordingScroll::default());
        let mut form = CreditCardForm::new(FormConfig::default(), props(None, &cbs))
            .with_scroll_handle(scroll.clone());
        form.mount();
        form.on_field_layout(FieldId::Expiry, Rect::new(300.0, 0.0, 70.0, 40.0));
        form.on_field_layout(FieldId::Number, Rect::new(10.0, 0.0, 265.0, 40.0));

        form.update(props(Some(FieldId::Expiry), &cbs));
        form.update(props(Some(FieldId::Number), &cbs));
        assert_eq!(*scroll.calls.borrow(), vec![(260.0, true), (0.0, true)]);
    }

    #[test]
    fn test_unmeasured_field_is_focused_without_scrolling() {
        let (cbs, log) = callbacks();
        let scroll = Rc::new(RecordingScroll::default());
        let mut form = CreditCardForm::new(FormConfig::default(), props(Some(FieldId::Expiry), &cbs))
            .with_scroll_handle(scroll.clone());
        form.mount();
        // a late measurement does not trigger the skipped scroll
        form.on_field_layout(FieldId::Expiry, Rect::new(300.0, 0.0, 70.0, 40.0));
        assert_eq!(*log.borrow(), vec!["focus:expiry".to_string()]);
        assert!(scroll.calls.borrow().is_empty());
    }

    #[test]
    fn test_hidden_field_scrolls_without_focus() {
        let (cbs, log) = callbacks();
        let scroll = Rc::new(RecordingScroll::default());
        let mut form = CreditCardForm::new(FormConfig::default(), props(None, &cbs))
            .with_scroll_handle(scroll.clone());
        form.mount();
        form.on_field_layout(FieldId::PostalCode, Rect::new(500.0, 0.0, 120.0, 40.0));
        form.update(props(Some(FieldId::PostalCode), &cbs));
        assert!(log.borrow().is_empty());
        assert_eq!(*scroll.calls.borrow(), vec![(460.0, true)]);
    }

    #[test]
    fn test_width_policy() {
        let form = CreditCardForm::new(FormConfig::default(), FormProps::default());
        let number = form.container_modifier(FieldId::Number);
        assert_eq!(number.width, Some(265.0));
        assert_eq!(number.margin_left, Some(10.0));
        assert_eq!(form.container_modifier(FieldId::Expiry).width, Some(70.0));
        assert_eq!(form.container_modifier(FieldId::Cvc).width, Some(70.0));
        assert_eq!(form.container_modifier(FieldId::PostalCode).width, Some(120.0));
        assert_eq!(form.container_modifier(FieldId::Name).width, Some(265.0));

        let vertical = FormConfig {
            horizontal_scroll: false,
            ..FormConfig::default()
        };
        let form = CreditCardForm::new(vertical, FormProps::default());
        let number = form.container_modifier(FieldId::Number);
        assert_eq!(number.width, None);
        assert_eq!(number.width_fraction, Some(1.0));
        assert_eq!(number.margin_left, None);
    }

    #[test]
    fn test_caller_styles_override_base() {
        let mut config = FormConfig::default();
        config.styles.input_container = Modifier::new().width(90.0);
        config.styles.input = TextStyle::new().color(Color::BLUE);
        let form = CreditCardForm::new(config, FormProps::default());
        assert_eq!(form.container_modifier(FieldId::Cvc).width, Some(90.0));

        let p = form.field_props(FieldId::Cvc);
        assert_eq!(p.input_style.height, Some(40.0));
        assert_eq!(p.input_style.color, Some(Color::BLUE));
        assert_eq!(p.label_style.bold, Some(true));
        assert_eq!(p.label, "CVC/CCV");
        assert_eq!(p.placeholder, "CVC");
        assert_eq!(p.keyboard, KeyboardType::Numeric);
        assert_eq!(form.field_props(FieldId::Name).keyboard, KeyboardType::Default);
    }

    #[test]
    fn test_layout_pass_captures_field_boxes_and_clamps_scroll() {
        let (cbs, _log) = callbacks();
        let clock = Rc::new(TestClock::new());
        let mut form = CreditCardForm::with_clock(FormConfig::default(), props(None, &cbs), clock.clone());
        form.mount();
        assert!(form.layout(viewport()).is_some());

        assert_eq!(form.layout_record(FieldId::Number).map(|r| r.x), Some(20.0));
        assert_eq!(form.layout_record(FieldId::Expiry).map(|r| r.x), Some(295.0));
        assert_eq!(form.layout_record(FieldId::Cvc).map(|r| r.x), Some(375.0));
        assert_eq!(form.scroll_state().max_offset(), 80.0);

        form.update(props(Some(FieldId::Expiry), &cbs));
        assert_eq!(form.scroll_state().target(), Some(80.0));
        clock.advance(Duration::from_millis(400));
        assert!(!form.tick());
        assert_eq!(form.scroll_state().get(), 80.0);
    }

    #[test]
    fn test_tap_anywhere_in_field_focuses_it() {
        let (cbs, log) = callbacks();
        let mut form = CreditCardForm::new(FormConfig::default(), props(None, &cbs));
        assert!(!form.tap(Vec2 { x: 300.0, y: 230.0 }));
        form.mount();
        form.layout(viewport());

        // the label row of the expiry field, above its input
        assert!(form.tap(Vec2 { x: 300.0, y: 215.0 }));
        form.scroll_state().set_offset(80.0);
        assert!(form.tap(Vec2 { x: 300.0, y: 215.0 }));
        assert!(!form.tap(Vec2 { x: 300.0, y: 5.0 }));
        assert_eq!(
            *log.borrow(),
            vec!["focus:expiry".to_string(), "focus:cvc".to_string()]
        );
    }

    #[test]
    fn test_keystrokes_go_to_focused_input() {
        let (cbs, log) = callbacks();
        let mut form = CreditCardForm::new(FormConfig::default(), props(Some(FieldId::Number), &cbs));
        assert!(!form.key(TextEdit::Insert("4".into())));
        form.mount();
        assert!(form.key(TextEdit::Insert("4".into())));
        assert_eq!(
            *log.borrow(),
            vec!["focus:number".to_string(), "change:number:4".to_string()]
        );
    }

    #[test]
    fn test_update_forwards_lifecycle_events() {
        let (cbs, log) = callbacks();
        let mut form = CreditCardForm::new(FormConfig::default(), props(None, &cbs));
        let mut next = props(None, &cbs);
        next.snapshot.values.insert(FieldId::Cvc, "1".into());
        next.snapshot.status.insert(FieldId::Expiry, FieldStatus::Valid);
        form.update(next.clone());
        next.snapshot.status.insert(FieldId::Expiry, FieldStatus::Invalid);
        form.update(next);
        assert_eq!(
            *log.borrow(),
            vec!["become_empty:cvc".to_string(), "become_valid:expiry".to_string()]
        );
    }

    #[test]
    fn test_advance_walks_visible_order() {
        let (cbs, log) = callbacks();
        let config = FormConfig {
            requires_cvc: false,
            requires_postal_code: true,
            ..FormConfig::default()
        };
        let mut form = CreditCardForm::new(config, props(Some(FieldId::Number), &cbs));
        form.mount();
        assert_eq!(form.next_field(FieldId::Expiry), Some(FieldId::PostalCode));
        assert_eq!(form.previous_field(FieldId::Number), None);
        assert_eq!(form.previous_field(FieldId::PostalCode), Some(FieldId::Expiry));
        assert_eq!(form.next_field(FieldId::Cvc), None);

        assert_eq!(form.advance_focus(), Some(FieldId::Expiry));
        assert_eq!(form.advance_focus(), Some(FieldId::PostalCode));
        assert_eq!(form.advance_focus(), None);
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_reconfigure_registers_and_drops_handles() {
        let (cbs, log) = callbacks();
        let mut form = CreditCardForm::new(FormConfig::default(), props(None, &cbs));
        form.mount();
        assert!(form.field(FieldId::Name).is_none());

        form.reconfigure(FormConfig {
            requires_name: true,
            ..FormConfig::default()
        });
        assert!(form.handles.contains(FieldId::Name));
        form.update(props(Some(FieldId::Name), &cbs));
        assert!(form.field(FieldId::Name).is_some_and(CardField::is_focused));
        form.on_field_layout(FieldId::Name, Rect::new(455.0, 0.0, 265.0, 40.0));

        form.reconfigure(FormConfig::default());
        assert!(form.field(FieldId::Name).is_none());
        assert!(!form.handles.contains(FieldId::Name));
        assert_eq!(form.focused_input(), None);
        assert!(form.layout_record(FieldId::Name).is_some());
        assert_eq!(*log.borrow(), vec!["focus:name".to_string()]);
    }

    #[test]
    fn test_dropped_field_is_no_longer_tappable() {
        let (cbs, log) = callbacks();
        let config = FormConfig {
            requires_name: true,
            ..FormConfig::default()
        };
        let mut form = CreditCardForm::new(config, props(None, &cbs));
        form.mount();
        form.layout(viewport());
        // name sits at x=455 in a 720-wide strip
        form.scroll_state().set_offset(345.0);
        let over_name = Vec2 { x: 120.0, y: 215.0 };

        form.reconfigure(FormConfig::default());
        assert!(!form.tap(over_name));
        assert_eq!(form.focused_input(), None);
        assert!(log.borrow().is_empty());

        form.layout(viewport());
        form.scroll_state().set_offset(0.0);
        assert!(form.tap(Vec2 { x: 300.0, y: 215.0 }));
        assert_eq!(*log.borrow(), vec!["focus:expiry".to_string()]);
    }

    #[test]
    fn test_view_shows_preview_then_fields() {
        let config = FormConfig {
            requires_name: true,
            ..FormConfig::default()
        };
        let form = CreditCardForm::new(config, FormProps::default());
        let v = form.view();
        assert_eq!(v.children.len(), 2);
        let labels: Vec<String> = v.children[1].children[0]
            .children
            .iter()
            .map(View::text_content)
            .collect();
        assert_eq!(labels, vec!["CARD NUMBER", "EXPIRY", "CVC/CCV", "CARDHOLDER'S NAME"]);
    }

    #[test]
    fn test_from_provider() {
        struct Fixed(Cell<u32>);
        impl StateProvider for Fixed {
            fn snapshot(&self) -> FormSnapshot {
                self.0.set(self.0.get() + 1);
                FormSnapshot {
                    focused: Some(FieldId::Cvc),
                    ..FormSnapshot::default()
                }
            }
            fn callbacks(&self) -> FormCallbacks {
                FormCallbacks::new()
            }
        }
        let p = Fixed(Cell::new(0));
        let props = FormProps::from_provider(&p);
        assert_eq!(props.snapshot.focused, Some(FieldId::Cvc));
        assert_eq!(p.0.get(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_json() {
        let config: FormConfig = serde_json::from_str(
            r##"{
                "requiresName": true,
                "requiresCVC": false,
                "labels": { "number": "NUMBER", "postalCode": "ZIP" },
                "validColor": "green",
                "invalidColor": "#ff8800",
                "metrics": { "windowWidth": 414 },
                "card": { "scale": 0.8 }
            }"##,
        )
        .unwrap();
        assert!(config.requires_name);
        assert!(!config.requires_cvc);
        assert_eq!(config.labels.get(FieldId::PostalCode).map(String::as_str), Some("ZIP"));
        assert_eq!(config.labels.get(FieldId::Cvc), None);
        assert_eq!(config.valid_color, Some(Color::GREEN));
        assert_eq!(config.invalid_color, Some(Color::from_rgb(255, 136, 0)));
        assert_eq!(config.placeholder_color, Some(Color::GRAY));
        assert_eq!(config.metrics.card_number_input_width(), 304.0);
        assert_eq!(config.card.scale, 0.8);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_empty_color_means_unset() {
        let config: FormConfig = serde_json::from_str(
            r#"{ "validColor": "", "invalidColor": null, "placeholderColor": "grey" }"#,
        )
        .unwrap();
        assert_eq!(config.valid_color, None);
        assert_eq!(config.invalid_color, None);
        assert_eq!(config.placeholder_color, Some(Color::GRAY));

        let defaults: FormConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults.invalid_color, Some(Color::RED));
        assert!(serde_json::from_str::<FormConfig>(r#"{ "validColor": "mauve" }"#).is_err());
    }
}
