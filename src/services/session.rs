//! One-shot flash messages carried in cookies.

use axum_extra::extract::cookie::{Cookie, CookieJar};

pub const FLASH_ERROR_COOKIE: &str = "flash_error";
pub const FLASH_SUCCESS_COOKIE: &str = "flash_success";

/// Messages left for the next page a user sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMessages {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Read the pending messages and queue their removal.
pub fn take_messages(jar: CookieJar, path: &str) -> (CookieJar, SessionMessages) {
    let read = |name: &str| {
        jar.get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    };
    let messages = SessionMessages {
        error: read(FLASH_ERROR_COOKIE),
        success: read(FLASH_SUCCESS_COOKIE),
    };

    let mut jar = jar;
    for name in [FLASH_ERROR_COOKIE, FLASH_SUCCESS_COOKIE] {
        if jar.get(name).is_some() {
            jar = jar.remove(Cookie::build(name).path(path.to_string()));
        }
    }
    (jar, messages)
}

pub fn flash_error(jar: CookieJar, message: &str, path: &str) -> CookieJar {
    jar.add(flash_cookie(FLASH_ERROR_COOKIE, message, path))
}

fn flash_cookie(name: &'static str, message: &str, path: &str) -> Cookie<'static> {
    Cookie::build((name, message.to_string()))
        .path(path.to_string())
        .http_only(true)
        .build()
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};

    use super::*;

    fn request_jar(cookie_header: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie_header).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn messages_are_read_once() {
        let jar = request_jar("flash_error=unauthorized; flash_success=saved; other=1");
        let (jar, messages) = take_messages(jar, "/");

        assert_eq!(messages.error.as_deref(), Some("unauthorized"));
        assert_eq!(messages.success.as_deref(), Some("saved"));
        assert!(jar.get(FLASH_ERROR_COOKIE).is_none());
        assert!(jar.get(FLASH_SUCCESS_COOKIE).is_none());
        assert_eq!(jar.get("other").map(|c| c.value()), Some("1"));
    }

    #[test]
    fn nothing_pending() {
        let (_, messages) = take_messages(request_jar("other=1"), "/");
        assert_eq!(messages, SessionMessages::default());
    }

    #[test]
    fn flash_round_trip() {
        let jar = request_jar("flash_success=welcome back");
        let jar = flash_error(jar, "unauthorized", "/app");
        let cookie = jar.get(FLASH_ERROR_COOKIE).unwrap();
        assert_eq!(cookie.value(), "unauthorized");
        assert_eq!(cookie.path(), Some("/app"));

        let (_, messages) = take_messages(jar, "/app");
        assert_eq!(messages.success.as_deref(), Some("welcome back"));
        assert_eq!(messages.error.as_deref(), Some("unauthorized"));
    }
}
