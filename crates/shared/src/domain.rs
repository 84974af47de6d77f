use std::fmt;

/// Which action table a request is resolved against.
///
/// Only POST is distinguished; every other verb dispatches through the GET table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionMethod {
    Get,
    Post,
}

impl ActionMethod {
    pub fn from_verb(verb: &str) -> Self {
        if verb.eq_ignore_ascii_case("post") {
            Self::Post
        } else {
            Self::Get
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for ActionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
