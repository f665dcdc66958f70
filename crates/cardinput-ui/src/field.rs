//! A single labelled card field.
//!
//! `CardField` renders a label and a controlled input, colours the input by
//! validity, and forwards every event tagged with its [`FieldId`]. It does no
//! validation of its own.

use std::cell::RefCell;
use std::rc::Rc;

use cardinput_core::*;

use crate::focus::{Focusable, InputFocus};
use crate::textfield::{TextEdit, TextInputState};
use crate::{Box, Text};

/// Everything a field is rendered from. Rebuilt by the form on every update.
#[derive(Clone)]
pub struct FieldProps {
    pub field: FieldId,
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub status: FieldStatus,
    pub keyboard: KeyboardType,

    pub container: Modifier,
    pub input_style: TextStyle,
    pub label_style: TextStyle,

    pub valid_color: Option<Color>,
    pub invalid_color: Option<Color>,
    pub placeholder_color: Option<Color>,

    pub on_layout: Option<LayoutCallback>,
    pub callbacks: FormCallbacks,
    pub input_props: InputProps,
}

impl FieldProps {
    pub fn new(field: FieldId) -> Self {
        Self {
            field,
            label: String::new(),
            value: String::new(),
            placeholder: String::new(),
            status: FieldStatus::Incomplete,
            keyboard: KeyboardType::Default,
            container: Modifier::default(),
            input_style: TextStyle::default(),
            label_style: TextStyle::default(),
            valid_color: None,
            invalid_color: None,
            placeholder_color: None,
            on_layout: None,
            callbacks: FormCallbacks::default(),
            input_props: InputProps::new(),
        }
    }
}

impl std::fmt::Debug for FieldProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldProps")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("value", &self.value)
            .field("placeholder", &self.placeholder)
            .field("status", &self.status)
            .field("keyboard", &self.keyboard)
            .field("container", &self.container)
            .field("input_style", &self.input_style)
            .field("label_style", &self.label_style)
            .field("valid_color", &self.valid_color)
            .field("invalid_color", &self.invalid_color)
            .field("placeholder_color", &self.placeholder_color)
            .field("on_layout", &self.on_layout.as_ref().map(|_| "..."))
            .field("callbacks", &self.callbacks)
            .field("input_props", &self.input_props)
            .finish()
    }
}

/// Input colour for a status: the valid colour if the status is valid and
/// one is configured, else the invalid colour under the same rule, else
/// `base`.
pub fn resolve_text_color(
    status: FieldStatus,
    valid_color: Option<Color>,
    invalid_color: Option<Color>,
    base: Color,
) -> Color {
    match (status, valid_color, invalid_color) {
        (FieldStatus::Valid, Some(c), _) => c,
        (FieldStatus::Invalid, _, Some(c)) => c,
        _ => base,
    }
}

struct FieldInner {
    field: FieldId,
    callbacks: RefCell<FormCallbacks>,
    input: RefCell<TextInputState>,
    focus: InputFocus,
}

impl Focusable for FieldInner {
    fn focus(&self) {
        let already = self.focus.is(self.field);
        self.focus.set(Some(self.field));
        if already {
            return;
        }
        let cbs = self.callbacks.borrow().clone();
        cbs.focus(self.field);
    }
}

pub struct CardField {
    props: FieldProps,
    inner: Rc<FieldInner>,
}

impl CardField {
    pub fn new(props: FieldProps, focus: InputFocus) -> Self {
        let mut input = TextInputState::new();
        input.sync(&props.value);
        let inner = Rc::new(FieldInner {
            field: props.field,
            callbacks: RefCell::new(props.callbacks.clone()),
            input: RefCell::new(input),
            focus,
        });
        Self { props, inner }
    }

    pub fn id(&self) -> FieldId {
        self.props.field
    }

    pub fn props(&self) -> &FieldProps {
        &self.props
    }

    /// Imperative focus capability, for the form's handle table.
    pub fn handle(&self) -> Rc<dyn Focusable> {
        self.inner.clone()
    }

    pub fn focus(&self) {
        self.inner.focus();
    }

    pub fn is_focused(&self) -> bool {
        self.inner.focus.is(self.props.field)
    }

    /// Applies new props and emits the lifecycle callbacks.
    ///
    /// Both trigger conditions are inverted relative to their names and kept
    /// that way for compatibility: `on_become_empty` fires when the value
    /// goes from `""` to non-empty, `on_become_valid` when the status leaves
    /// `valid`.
    pub fn update(&mut self, next: FieldProps) {
        debug_assert_eq!(self.props.field, next.field);
        let prev = std::mem::replace(&mut self.props, next);
        *self.inner.callbacks.borrow_mut() = self.props.callbacks.clone();
        self.inner.input.borrow_mut().sync(&self.props.value);

        let field = self.props.field;
        if prev.value.is_empty() && !self.props.value.is_empty() {
            log::trace!("{field}: value left empty");
            self.props.callbacks.become_empty(field);
        }
        if prev.status == FieldStatus::Valid && self.props.status != FieldStatus::Valid {
            log::trace!("{field}: status left valid");
            self.props.callbacks.become_valid(field);
        }
    }

    /// Handles a keystroke. Text-changing edits are reported through
    /// `on_change` with the new raw value; the shown value only changes once
    /// the provider sends it back.
    pub fn edit(&self, edit: TextEdit) {
        let next = self.inner.input.borrow_mut().apply(&self.props.value, edit);
        if let Some(value) = next {
            self.props.callbacks.change(self.props.field, value);
        }
    }

    pub fn caret(&self) -> usize {
        self.inner.input.borrow().caret
    }

    pub fn text_color(&self) -> Color {
        let base = self.props.input_style.color.unwrap_or(Color::BLACK);
        resolve_text_color(
            self.props.status,
            self.props.valid_color,
            self.props.invalid_color,
            base,
        )
    }

    pub fn view(&self) -> View {
        let p = &self.props;
        let mut container = p.container.clone();
        container.on_layout = p.on_layout.clone();
        // the whole field box is tap-targetable, not just the input
        let handle = self.inner.clone();
        container.on_click = Some(Rc::new(move || handle.focus()));

        let mut children = Vec::with_capacity(2);
        if !p.label.is_empty() {
            children.push(Text(p.label.clone(), p.label_style.clone()));
        }
        children.push(View::new(
            0,
            ViewKind::TextInput {
                value: p.value.clone(),
                placeholder: p.placeholder.clone(),
                placeholder_color: p.placeholder_color,
                style: p.input_style.clone().color(self.text_color()),
                keyboard: p.keyboard,
                auto_capitalize: AutoCapitalize::Words,
                auto_correct: false,
                focused: self.is_focused(),
                extra: p.input_props.clone(),
            },
        ));
        Box(container).with_children(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<String>>>;

    fn recording() -> (FormCallbacks, Log) {
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

    fn props(field: FieldId, value: &str, status: FieldStatus, cbs: &FormCallbacks) -> FieldProps {
        FieldProps {
            value: value.into(),
            status,
            callbacks: cbs.clone(),
            ..FieldProps::new(field)
        }
    }

    #[test]
    fn test_color_priority_is_two_branch() {
        let base = Color::BLACK;
        let valid = Some(Color::GREEN);
        let invalid = Some(Color::RED);
        for id in FieldId::ALL {
            let color_for = |status, valid_color, invalid_color| {
                let p = FieldProps {
                    status,
                    valid_color,
                    invalid_color,
                    ..FieldProps::new(id)
                };
                CardField::new(p, InputFocus::new()).text_color()
            };
            assert_eq!(color_for(FieldStatus::Valid, valid, invalid), Color::GREEN);
            assert_eq!(color_for(FieldStatus::Invalid, valid, invalid), Color::RED);
            assert_eq!(color_for(FieldStatus::Incomplete, valid, invalid), base);
            // valid without a valid colour never borrows the invalid one
            assert_eq!(color_for(FieldStatus::Valid, None, invalid), base);
            assert_eq!(color_for(FieldStatus::Invalid, valid, None), base);
        }
    }

    #[test]
    fn test_text_color_uses_input_style_as_base() {
        let mut p = FieldProps::new(FieldId::Cvc);
        p.input_style = TextStyle::new().color(Color::BLUE);
        p.invalid_color = Some(Color::RED);
        p.status = FieldStatus::Incomplete;
        let f = CardField::new(p.clone(), InputFocus::new());
        assert_eq!(f.text_color(), Color::BLUE);

        p.status = FieldStatus::Invalid;
        let f = CardField::new(p, InputFocus::new());
        assert_eq!(f.text_color(), Color::RED);
    }

    #[test]
    fn test_become_empty_fires_only_when_leaving_empty() {
        let (cbs, log) = recording();
        let mut f = CardField::new(
            props(FieldId::Number, "", FieldStatus::Incomplete, &cbs),
            InputFocus::new(),
        );
        f.update(props(FieldId::Number, "4", FieldStatus::Incomplete, &cbs));
        f.update(props(FieldId::Number, "42", FieldStatus::Incomplete, &cbs));
        f.update(props(FieldId::Number, "4", FieldStatus::Incomplete, &cbs));
        f.update(props(FieldId::Number, "", FieldStatus::Incomplete, &cbs));
        assert_eq!(*log.borrow(), vec!["become_empty:number".to_string()]);
    }

    #[test]
    fn test_become_valid_fires_only_when_leaving_valid() {
        let (cbs, log) = recording();
        let mut f = CardField::new(
            props(FieldId::Expiry, "12/3", FieldStatus::Incomplete, &cbs),
            InputFocus::new(),
        );
        f.update(props(FieldId::Expiry, "12/34", FieldStatus::Valid, &cbs));
        assert!(log.borrow().is_empty());
        f.update(props(FieldId::Expiry, "12/3", FieldStatus::Incomplete, &cbs));
        f.update(props(FieldId::Expiry, "12/", FieldStatus::Incomplete, &cbs));
        assert_eq!(*log.borrow(), vec!["become_valid:expiry".to_string()]);
    }

    #[test]
    fn test_keystroke_reports_raw_value_without_mutating() {
        let (cbs, log) = recording();
        let f = CardField::new(
            props(FieldId::Cvc, "12", FieldStatus::Incomplete, &cbs),
            InputFocus::new(),
        );
        f.edit(TextEdit::Insert("3".into()));
        f.edit(TextEdit::Left);
        assert_eq!(f.props().value, "12");
        assert_eq!(*log.borrow(), vec!["change:cvc:123".to_string()]);
    }

    #[test]
    fn test_focus_reports_once_and_moves_input_focus() {
        let (cbs, log) = recording();
        let focus = InputFocus::new();
        let number = CardField::new(
            props(FieldId::Number, "", FieldStatus::Incomplete, &cbs),
            focus.clone(),
        );
        let cvc = CardField::new(
            props(FieldId::Cvc, "", FieldStatus::Incomplete, &cbs),
            focus.clone(),
        );
        number.handle().focus();
        number.focus();
        assert!(number.is_focused());
        cvc.focus();
        assert!(!number.is_focused());
        assert_eq!(
            *log.borrow(),
            vec!["focus:number".to_string(), "focus:cvc".to_string()]
        );
    }

    #[test]
    fn test_props_debug_elides_callbacks() {
        let mut p = FieldProps::new(FieldId::Expiry);
        p.on_layout = Some(Rc::new(|_: Rect| {}));
        let dbg = format!("{p:?}");
        assert!(dbg.starts_with("FieldProps { field: Expiry"));
        assert!(dbg.contains(r#"on_layout: Some("...")"#));
    }

    #[test]
    fn test_view_skips_empty_label_and_is_clickable() {
        let (cbs, log) = recording();
        let mut p = props(FieldId::Name, "", FieldStatus::Incomplete, &cbs);
        p.placeholder = "Full Name".into();
        let f = CardField::new(p.clone(), InputFocus::new());
        let v = f.view();
        assert_eq!(v.children.len(), 1);
        (v.modifier.on_click.expect("clickable"))();
        assert_eq!(*log.borrow(), vec!["focus:name".to_string()]);

        p.label = "CARDHOLDER'S NAME".into();
        let v = CardField::new(p, InputFocus::new()).view();
        assert_eq!(v.text_content(), "CARDHOLDER'S NAME");
        assert!(matches!(
            &v.children[1].kind,
            ViewKind::TextInput { placeholder, auto_correct: false, .. } if placeholder == "Full Name"
        ));
    }
}
