use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Cookie holding the signed-in user's [Profile].
pub const PROFILE_COOKIE: &str = "bittube_profile";

/// The signed-in user, as remembered by the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
}

impl Profile {
    /// Reads the profile out of the session, if there is a valid one.
    pub fn from_jar(jar: &SignedCookieJar) -> Option<Self> {
        let cookie = jar.get(PROFILE_COOKIE)?;

        match serde_json::from_str(cookie.value()) {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::warn!(%err, "ignoring malformed session profile");
                None
            }
        }
    }

    /// Remembers this profile in the session.
    #[cfg(test)]
    pub fn store(&self, jar: SignedCookieJar) -> Result<SignedCookieJar, serde_json::Error> {
        let value = serde_json::to_string(self)?;
        let cookie = Cookie::build((PROFILE_COOKIE, value))
            .path("/")
            .http_only(true)
            .build();

        Ok(jar.add(cookie))
    }

    /// Forgets whoever is signed in.
    pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(Cookie::build(PROFILE_COOKIE).path("/"))
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::Key;

    use super::*;

    fn profile() -> Profile {
        Profile::new("user-7".into(), "Robin".into())
    }

    #[test]
    fn stored_profile_reads_back() {
        let jar = SignedCookieJar::new(Key::generate());
        let jar = profile().store(jar).unwrap();

        assert_eq!(Profile::from_jar(&jar), Some(profile()));
    }

    #[test]
    fn empty_session_has_no_profile() {
        let jar = SignedCookieJar::new(Key::generate());
        assert_eq!(Profile::from_jar(&jar), None);
    }

    #[test]
    fn cleared_session_has_no_profile() {
        let jar = profile().store(SignedCookieJar::new(Key::generate())).unwrap();
        let jar = Profile::clear(jar);

        assert_eq!(Profile::from_jar(&jar), None);
    }

    #[test]
    fn malformed_profile_is_ignored() {
        let jar = SignedCookieJar::new(Key::generate()).add(Cookie::new(PROFILE_COOKIE, "{oops"));
        assert_eq!(Profile::from_jar(&jar), None);
    }

    #[test]
    fn profile_cookie_is_http_only() {
        let jar = profile().store(SignedCookieJar::new(Key::generate())).unwrap();
        let cookie = jar.get(PROFILE_COOKIE).unwrap();

        assert_eq!(cookie.http_only(), Some(true));
    }
}
