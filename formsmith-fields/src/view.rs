//! Renderable output produced by field render variants.
//!
//! A `View` is a small, framework-neutral tree. Hosts ship it to a frontend
//! as JSON or print it with the `Display` impl, which draws an indented outline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of value an input accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    Text,
    File,
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A node of the render tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum View {
    Column {
        children: Vec<View>,
    },
    Label {
        text: String,
        #[serde(default)]
        required: bool,
        #[serde(default)]
        invalid: bool,
    },
    Text {
        text: String,
        #[serde(default)]
        muted: bool,
        #[serde(default)]
        invalid: bool,
    },
    Input {
        name: String,
        input: InputKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accept: Option<String>,
        #[serde(default)]
        readonly: bool,
        #[serde(default)]
        invalid: bool,
    },
    Switch {
        name: String,
        label: String,
        checked: bool,
    },
    Image {
        src: String,
        alt: String,
    },
    Notice {
        level: NoticeLevel,
        text: String,
    },
}

impl View {
    pub fn column(children: Vec<View>) -> Self {
        View::Column { children }
    }

    pub fn label(text: impl Into<String>, required: bool, invalid: bool) -> Self {
        View::Label {
            text: text.into(),
            required,
            invalid,
        }
    }

    /// Muted helper text under a control.
    pub fn helper(text: impl Into<String>, invalid: bool) -> Self {
        View::Text {
            text: text.into(),
            muted: true,
            invalid,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        View::Text {
            text: text.into(),
            muted: false,
            invalid: false,
        }
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        View::Image {
            src: src.into(),
            alt: alt.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        View::Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        View::Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    /// True if this node or any descendant is flagged invalid or is an error notice.
    pub fn shows_error(&self) -> bool {
        match self {
            View::Column { children } => children.iter().any(View::shows_error),
            View::Label { invalid, .. }
            | View::Text { invalid, .. }
            | View::Input { invalid, .. } => *invalid,
            View::Notice { level, .. } => *level == NoticeLevel::Error,
            View::Switch { .. } | View::Image { .. } => false,
        }
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            View::Column { children } => {
                for child in children {
                    child.write_outline(f, depth)?;
                }
                Ok(())
            }
            View::Label {
                text,
                required,
                invalid,
            } => {
                let star = if *required { "*" } else { "" };
                let flag = if *invalid { " (!)" } else { "" };
                writeln!(f, "{pad}{text}{star}{flag}")
            }
            View::Text { text, muted, .. } => {
                if *muted {
                    writeln!(f, "{pad}  {text}")
                } else {
                    writeln!(f, "{pad}{text}")
                }
            }
            View::Input {
                input,
                value,
                placeholder,
                readonly,
                invalid,
                ..
            } => {
                let shown = match (value, placeholder) {
                    (Some(v), _) => v.clone(),
                    (None, Some(p)) => format!("<{p}>"),
                    (None, None) => String::new(),
                };
                let kind = match input {
                    InputKind::Text => "text",
                    InputKind::File => "file",
                };
                let ro = if *readonly { " readonly" } else { "" };
                let flag = if *invalid { " (!)" } else { "" };
                writeln!(f, "{pad}[{kind}{ro}: {shown}]{flag}")
            }
            View::Switch { label, checked, .. } => {
                let mark = if *checked { "x" } else { " " };
                writeln!(f, "{pad}[{mark}] {label}")
            }
            View::Image { src, alt } => writeln!(f, "{pad}<image {alt}: {src}>"),
            View::Notice { level, text } => match level {
                NoticeLevel::Info => writeln!(f, "{pad}note: {text}"),
                NoticeLevel::Error => writeln!(f, "{pad}error: {text}"),
            },
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}
