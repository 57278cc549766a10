use std::fmt;

/// Token attached to every request of a session
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    token: String,
}

impl SessionToken {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("token", &"<redacted>")
            .finish()
    }
}
