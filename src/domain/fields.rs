use rand::{distributions::Uniform, prelude::Distribution, Rng};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(u64);

impl UserId {
    pub fn inner(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Accepts any spelling of a whole number: `"7"`, `" 7 "`, `"7.0"`, `"7e0"`.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(id) = raw.parse::<u64>() {
            return Some(Self(id));
        }
        raw.parse::<f64>().ok().and_then(Self::from_whole_f64)
    }

    /// Same as [`UserId::parse_loose`] for JSON values; `true` counts as 1.
    pub fn from_json_loose(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .map(Self)
                .or_else(|| n.as_f64().and_then(Self::from_whole_f64)),
            Value::String(s) => Self::parse_loose(s),
            Value::Bool(true) => Some(Self(1)),
            _ => None,
        }
    }

    fn from_whole_f64(n: f64) -> Option<Self> {
        (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64)
            .then(|| Self(n as u64))
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn inner(&self) -> String {
        self.0.to_owned()
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored and compared as plaintext.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Password(String);

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReferralCode(String);

impl ReferralCode {
    pub const PREFIX: &'static str = "REF";
    pub const SUFFIX_LEN: usize = 5;

    /// `REF` followed by five uppercase base-36 characters.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let uni_sample = Uniform::from(0..36u32);
        let suffix: String = (0..Self::SUFFIX_LEN)
            .filter_map(|_| char::from_digit(uni_sample.sample(rng), 36))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self(format!("{}{}", Self::PREFIX, suffix))
    }

    pub fn inner(&self) -> String {
        self.0.to_owned()
    }
}

impl From<String> for ReferralCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ReferralCode {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for ReferralCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ReferralCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub password: Password,
    pub referral_code: ReferralCode,
    pub referred_by: Option<ReferralCode>,
    pub referrals: Vec<Username>,
    pub earnings: i64,
}

impl User {
    pub fn matches_credentials(&self, username: &Username, password: &Password) -> bool {
        &self.username == username && &self.password == password
    }
}
