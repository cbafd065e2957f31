use secrecy::{ExposeSecret, Secret};

/// Bearer credential handed out by `POST /auth/sign-in`.
#[derive(Debug, Clone)]
pub struct AuthToken(Secret<String>);

impl AuthToken {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            None
        } else {
            Some(Self(Secret::new(s.to_string())))
        }
    }
}

impl ExposeSecret<String> for AuthToken {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}
