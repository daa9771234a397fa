use super::fields::{ReferralCode, User, UserId, Username};
use serde::Serialize;

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewRegisterEvent {
    pub id: UserId,
    pub username: Username,
    pub referral_code: ReferralCode,
    pub referred_by: Option<ReferralCode>,
}

impl From<&User> for NewRegisterEvent {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            referral_code: user.referral_code.clone(),
            referred_by: user.referred_by.clone(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct NewLoginEvent {
    pub id: UserId,
    pub username: Username,
}

impl From<&User> for NewLoginEvent {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewReferralEvent {
    pub referrer: Username,
    pub referred_user: Username,
    pub bonus: u32,
}

#[derive(Serialize, Clone, Debug)]
#[serde(tag = "type", content = "data")]
pub enum AppEvent {
    NewLogin(NewLoginEvent),
    NewRegister(NewRegisterEvent),
    NewReferral(NewReferralEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_and_carry_no_password() {
        let user = User {
            id: 3.into(),
            username: "carol".into(),
            password: "secret".into(),
            referral_code: "REFZZ999".into(),
            referred_by: Some("REFAB12C".into()),
            referrals: vec![],
            earnings: 0,
        };

        let json = serde_json::to_value(AppEvent::NewRegister((&user).into())).unwrap();
        assert_eq!(json["type"], "NewRegister");
        assert_eq!(json["data"]["referralCode"], "REFZZ999");
        assert_eq!(json["data"]["referredBy"], "REFAB12C");
        assert!(!json.to_string().contains("secret"));

        let json = serde_json::to_value(AppEvent::NewLogin((&user).into())).unwrap();
        assert_eq!(json["type"], "NewLogin");
        assert_eq!(json["data"]["id"], 3);
        assert!(!json.to_string().contains("secret"));
    }
}
