use serde::{Deserialize, Serialize};

use super::role::Role;

/// A single role-tagged turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Build a message whose content is wrapped in `<tag>...</tag>`. An empty
    /// tag leaves the content untouched.
    pub fn tagged<S: Into<String>>(role: Role, content: S, tag: &str) -> Self {
        let content = content.into();
        if tag.is_empty() {
            Self::new(role, content)
        } else {
            Self::new(role, format!("<{tag}>{content}</{tag}>"))
        }
    }

    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
