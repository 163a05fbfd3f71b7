//! Animatable element identity
//!
//! A target is the identity of one animatable element across a transition.
//! Its geometry (measured before/after values) is supplied by the caller;
//! the compiler only keys matrix rows by it.

use std::fmt;

/// An animatable element identity: an id plus an optional role for elements
/// that play a part in a larger composition (e.g. a list item vs its badge).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    id: String,
    role: Option<String>,
}

impl Target {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: None,
        }
    }

    pub fn with_role(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Some(role.into()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.role {
            Some(role) => write!(f, "id:{};role:{role}", self.id),
            None => write!(f, "id:{}", self.id),
        }
    }
}
