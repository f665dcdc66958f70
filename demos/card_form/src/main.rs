use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use cardinput_core::*;
use cardinput_ui::*;

enum Event {
    Focus(FieldId),
    Change(FieldId, String),
}

/// Toy State Provider: formats and validates with a few fixed rules and
/// moves focus on once a field turns valid.
#[derive(Default)]
struct CardState {
    values: FieldMap<String>,
    status: FieldMap<FieldStatus>,
    focused: Option<FieldId>,
    brand: Option<String>,
    queue: Rc<RefCell<VecDeque<Event>>>,
}

impl CardState {
    fn apply(&mut self, event: Event, order: &[FieldId]) {
        match event {
            Event::Focus(f) => self.focused = Some(f),
            Event::Change(f, raw) => {
                let value = self.format(f, &raw);
                let status = self.validate(f, &value);
                if f == FieldId::Number {
                    self.brand = brand_of(&value).map(str::to_string);
                }
                log::info!("{f}: {raw:?} -> {value:?} ({status})");
                self.values.insert(f, value);
                self.status.insert(f, status);
                if status == FieldStatus::Valid
                    && let Some(i) = order.iter().position(|&o| o == f)
                    && let Some(&next) = order.get(i + 1)
                {
                    self.focused = Some(next);
                }
            }
        }
    }

    fn format(&self, field: FieldId, raw: &str) -> String {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        match field {
            FieldId::Number => {
                let max = if self.brand.as_deref() == Some("american-express") { 15 } else { 16 };
                let digits: String = digits.chars().take(max).collect();
                digits
                    .as_bytes()
                    .chunks(4)
                    .filter_map(|c| std::str::from_utf8(c).ok())
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            FieldId::Expiry => {
                let d: String = digits.chars().take(4).collect();
                if d.len() > 2 { format!("{}/{}", &d[..2], &d[2..]) } else { d }
            }
            FieldId::Cvc => digits.chars().take(4).collect(),
            FieldId::PostalCode => digits.chars().take(5).collect(),
            FieldId::Name => raw.to_string(),
        }
    }

    fn validate(&self, field: FieldId, value: &str) -> FieldStatus {
        let digits: String = value.chars().filter(char::is_ascii_digit).collect();
        let complete = |n: usize| match digits.len().cmp(&n) {
            std::cmp::Ordering::Less => FieldStatus::Incomplete,
            _ => FieldStatus::Valid,
        };
        match field {
            FieldId::Number => match complete(if self.brand.as_deref() == Some("american-express") { 15 } else { 16 }) {
                FieldStatus::Valid if !luhn(&digits) => FieldStatus::Invalid,
                s => s,
            },
            FieldId::Expiry => match complete(4) {
                FieldStatus::Valid => match digits[..2].parse::<u8>() {
                    Ok(1..=12) => FieldStatus::Valid,
                    _ => FieldStatus::Invalid,
                },
                s => s,
            },
            FieldId::Cvc => complete(3),
            FieldId::PostalCode => complete(5),
            FieldId::Name if value.trim().is_empty() => FieldStatus::Incomplete,
            FieldId::Name => FieldStatus::Valid,
        }
    }
}

impl StateProvider for CardState {
    fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            values: self.values.clone(),
            status: self.status.clone(),
            focused: self.focused,
            brand: self.brand.clone(),
        }
    }

    fn callbacks(&self) -> FormCallbacks {
        // events are queued and applied between renders, never re-entrantly
        let focus_q = self.queue.clone();
        let change_q = self.queue.clone();
        FormCallbacks::new()
            .on_focus(move |f| focus_q.borrow_mut().push_back(Event::Focus(f)))
            .on_change(move |f, v| change_q.borrow_mut().push_back(Event::Change(f, v)))
            .on_become_empty(|f| log::debug!("{f}: left empty"))
            .on_become_valid(|f| log::debug!("{f}: left valid"))
    }
}

fn brand_of(number: &str) -> Option<&'static str> {
    let n = number.replace(' ', "");
    if n.starts_with("34") || n.starts_with("37") {
        Some("american-express")
    } else if n.starts_with('4') {
        Some("visa")
    } else if n.starts_with('5') {
        Some("master-card")
    } else {
        None
    }
}

fn luhn(digits: &str) -> bool {
    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| match (i % 2, d * 2) {
            (1, dd) if dd > 9 => dd - 9,
            (1, dd) => dd,
            _ => d,
        })
        .sum();
    sum % 10 == 0
}

/// Applies queued provider events, re-rendering after each, then lets any
/// scroll animation finish.
fn pump(form: &mut CreditCardForm, state: &mut CardState, viewport: Size) {
    let order = form.visible_fields();
    loop {
        let next = state.queue.borrow_mut().pop_front();
        let Some(event) = next else { break };
        state.apply(event, &order);
        form.update(FormProps::from_provider(&*state));
    }
    form.layout(viewport);
    while form.tick() {
        std::thread::sleep(Duration::from_millis(16));
    }
}

fn load_config() -> anyhow::Result<FormConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(FormConfig {
            requires_name: true,
            metrics: FormMetrics::for_window(414.0),
            ..FormConfig::default()
        });
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = load_config()?;
    let viewport = Size {
        width: config.metrics.window_width,
        height: 640.0,
    };
    let mut state = CardState {
        focused: Some(FieldId::Number),
        ..CardState::default()
    };
    let mut form = CreditCardForm::new(config, FormProps::from_provider(&state));
    form.mount();
    form.layout(viewport);

    pump(&mut form, &mut state, viewport);

    for chunk in ["4242424242424242", "1230", "123", "Jane Doe"] {
        for ch in chunk.chars() {
            form.key(TextEdit::Insert(ch.to_string()));
            pump(&mut form, &mut state, viewport);
        }
    }

    // tap the expiry field's label to go back and fix it
    let strip = form
        .layout(viewport)
        .and_then(|pass| pass.scrolls.first())
        .map(|sv| sv.rect);
    if let (Some(strip), Some(r)) = (strip, form.layout_record(FieldId::Expiry)) {
        let p = Vec2 {
            x: strip.x + r.x + 5.0 - form.scroll_state().get(),
            y: strip.y + r.y + 5.0,
        };
        if form.tap(p) {
            form.key(TextEdit::End);
            form.key(TextEdit::Backspace);
            pump(&mut form, &mut state, viewport);
        }
    }

    println!("{}", form.preview().view().text_content());
    for id in form.visible_fields() {
        let s = state.snapshot();
        println!("{id:>10}: {:<22} {}", s.value(id), s.status(id));
    }
    println!("scroll offset: {}", form.scroll_state().get());
    Ok(())
}
