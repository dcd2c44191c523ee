//! Users referenced as event authors.

use crate::cache::{CacheKey, Cacheable, EntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(Sex::Male),
            "w" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "m",
            Sex::Female => "w",
        }
    }
}

/// A remote user. The username is the user's id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    sex: Option<Sex>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        User {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn sex(&self) -> Option<Sex> {
        self.sex
    }

    pub fn set_sex(&mut self, sex: Sex) {
        self.sex = Some(sex);
    }

    /// Set the sex from its wire code. Unknown codes are ignored and the
    /// previous value is kept; returns whether the code was accepted.
    pub fn set_sex_code(&mut self, code: &str) -> bool {
        match Sex::from_code(code) {
            Some(sex) => {
                self.sex = Some(sex);
                true
            }
            None => false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Full name followed by the username in parentheses when they differ.
    pub fn long_name(&self) -> String {
        let full_name = self.full_name();
        if full_name.is_empty() || full_name == self.username {
            return self.username.clone();
        }
        if self.username.is_empty() {
            return full_name;
        }
        format!("{} ({})", full_name, self.username)
    }
}

impl Cacheable for User {
    const KIND: EntityKind = EntityKind::User;

    fn cache_key(&self) -> Option<CacheKey> {
        if self.username.is_empty() {
            None
        } else {
            Some(CacheKey::Name(self.username.clone()))
        }
    }
}
