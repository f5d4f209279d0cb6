//! One-shot status messages carried in a cookie across a redirect.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }
}

fn pending(jar: &CookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

/// Queue a message for the next page view
pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    let mut messages = pending(&jar);
    messages.push(flash);

    let value = match serde_json::to_string(&messages) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Dropping flash message");
            return jar;
        }
    };

    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Drain every queued message
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Flash>) {
    let messages = pending(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_then_take() {
        let jar = push(CookieJar::new(), Flash::success("Account created successfully!"));
        let jar = push(jar, Flash::info("Second"));

        let (jar, messages) = take(jar);
        assert_eq!(
            messages,
            vec![Flash::success("Account created successfully!"), Flash::info("Second")]
        );
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn test_take_on_empty_jar() {
        let (_, messages) = take(CookieJar::new());
        assert!(messages.is_empty());
    }

    #[test]
    fn test_corrupt_cookie_is_ignored() {
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "{not json"));
        let (_, messages) = take(jar);
        assert!(messages.is_empty());
    }
}
