use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Account credentials for the Sector Alarm cloud API.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account e-mail, sent as `userId` on login.
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

/// Bearer token state owned by a single [`SectorClient`](crate::SectorClient).
///
/// The API does not report token lifetime, so expiry is estimated as issue
/// time plus a fixed lifetime. The token is treated as stale `refresh_margin`
/// before that estimate so a request never races the real expiry.
#[derive(Debug, Clone)]
pub struct Session {
    token: Option<SecretString>,
    expires_at: Option<DateTime<Utc>>,
    lifetime: TimeDelta,
    refresh_margin: TimeDelta,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(TimeDelta::hours(1), TimeDelta::minutes(5))
    }
}

impl Session {
    pub fn new(lifetime: TimeDelta, refresh_margin: TimeDelta) -> Self {
        Self {
            token: None,
            expires_at: None,
            lifetime,
            refresh_margin,
        }
    }

    /// Store a freshly issued token. Returns the computed expiry.
    pub fn store(&mut self, token: SecretString, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        let expires_at = issued_at + self.lifetime;
        self.token = Some(token);
        self.expires_at = Some(expires_at);
        expires_at
    }

    /// Forget the token so the next call performs a full login.
    pub fn clear(&mut self) {
        self.token = None;
        self.expires_at = None;
    }

    /// Valid iff a token is present and `now < expiry - margin`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.token, self.expires_at) {
            (Some(_), Some(expires_at)) => now < expires_at - self.refresh_margin,
            _ => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Token value for the `Authorization: Bearer` header.
    pub(crate) fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| t.expose_secret().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-15T10:00:00Z")
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_default()
    }

    #[test]
    fn empty_session_is_invalid() {
        let session = Session::default();
        assert!(!session.is_valid_at(issued()));
        assert!(session.expires_at().is_none());
    }

    #[test]
    fn token_valid_until_margin_before_expiry() {
        let lifetime = TimeDelta::hours(1);
        let margin = TimeDelta::minutes(5);
        let mut session = Session::new(lifetime, margin);
        let t = issued();
        session.store(SecretString::from("abc".to_string()), t);

        assert!(session.is_valid_at(t));
        assert!(session.is_valid_at(t + TimeDelta::minutes(30)));
        assert!(session.is_valid_at(t + lifetime - margin - TimeDelta::seconds(1)));
        assert!(!session.is_valid_at(t + lifetime - margin));
        assert!(!session.is_valid_at(t + lifetime));
        assert!(!session.is_valid_at(t + TimeDelta::hours(2)));
    }

    #[test]
    fn clear_invalidates() {
        let mut session = Session::default();
        let t = issued();
        let expires = session.store(SecretString::from("abc".to_string()), t);
        assert_eq!(expires, t + TimeDelta::hours(1));

        session.clear();
        assert!(!session.is_valid_at(t));
        assert!(session.bearer().is_none());
    }

    #[test]
    fn bearer_exposes_token() {
        let mut session = Session::default();
        session.store(SecretString::from("tok-123".to_string()), issued());
        assert_eq!(session.bearer().as_deref(), Some("tok-123"));
    }
}
