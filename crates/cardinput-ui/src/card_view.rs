//! Card face preview. Pure rendering: it reads a snapshot and emits nothing.

use cardinput_core::*;

use crate::{Box, Column, Text};

const CARD_WIDTH: f32 = 300.0;
const CARD_HEIGHT: f32 = 190.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardFace {
    Front,
    Back,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct CardOptions {
    pub scale: f32,
    pub font_family: Option<String>,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            font_family: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardPreview {
    pub number: String,
    pub expiry: String,
    pub cvc: String,
    pub name: String,
    pub brand: Option<String>,
    pub focused: Option<FieldId>,
    pub options: CardOptions,
}

impl CardPreview {
    pub fn from_snapshot(s: &FormSnapshot, requires_name: bool, options: CardOptions) -> Self {
        Self {
            number: s.value(FieldId::Number).to_string(),
            expiry: s.value(FieldId::Expiry).to_string(),
            cvc: s.value(FieldId::Cvc).to_string(),
            // keeps the name line from showing a placeholder
            name: if requires_name {
                s.value(FieldId::Name).to_string()
            } else {
                " ".to_string()
            },
            brand: s.brand.clone(),
            focused: s.focused,
            options,
        }
    }

    /// Amex prints its CVC on the front, so only other brands flip.
    pub fn face(&self) -> CardFace {
        let amex = self.brand.as_deref() == Some("american-express");
        if !amex && self.focused == Some(FieldId::Cvc) {
            CardFace::Back
        } else {
            CardFace::Front
        }
    }

    fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
        if value.is_empty() { placeholder } else { value }
    }

    pub fn number_text(&self) -> &str {
        Self::or_placeholder(&self.number, "•••• •••• •••• ••••")
    }

    pub fn name_text(&self) -> &str {
        Self::or_placeholder(&self.name, "FULL NAME")
    }

    pub fn expiry_text(&self) -> &str {
        Self::or_placeholder(&self.expiry, "••/••")
    }

    pub fn cvc_text(&self) -> &str {
        Self::or_placeholder(&self.cvc, "•••")
    }

    fn line(&self, text: &str, field: FieldId) -> View {
        let mut style = TextStyle::new().color(Color::WHITE);
        if let Some(family) = &self.options.font_family {
            style = style.font_family(family.clone());
        }
        let color = if self.focused == Some(field) {
            Color::WHITE
        } else {
            Color::WHITE.with_alpha(178)
        };
        Text(text, style.color(color).font_size(16.0 * self.options.scale))
    }

    pub fn view(&self) -> View {
        let s = self.options.scale;
        let card = Modifier::new()
            .size(CARD_WIDTH * s, CARD_HEIGHT * s)
            .padding(16.0 * s)
            .background(Color::from_hex("#1f2a44"))
            .clip_rounded(12.0 * s);
        let mut lines = Vec::new();
        match self.face() {
            CardFace::Front => {
                if let Some(brand) = &self.brand {
                    lines.push(Text(brand.clone(), TextStyle::new().color(Color::WHITE)));
                }
                lines.push(self.line(self.number_text(), FieldId::Number));
                lines.push(self.line(self.name_text(), FieldId::Name));
                lines.push(self.line(self.expiry_text(), FieldId::Expiry));
                if self.brand.as_deref() == Some("american-express") {
                    lines.push(self.line(self.cvc_text(), FieldId::Cvc));
                }
            }
            CardFace::Back => {
                lines.push(self.line(self.cvc_text(), FieldId::Cvc));
            }
        }
        Column(Modifier::new().center_children()).child(Box(card).with_children(lines))
    }
}
