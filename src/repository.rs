use crate::domain::{
    errors::DatabaseError,
    fields::{Password, ReferralCode, User, UserId, Username},
};
use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// In-memory user table. Ids come from `next_id` and are never reused.
#[derive(Debug)]
pub struct UserStore {
    users: BTreeMap<UserId, User>,
    next_id: UserId,
}

impl Default for UserStore {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: UserId::from(1),
        }
    }
}

impl UserStore {
    pub fn insert(
        &mut self,
        username: Username,
        password: Password,
        referral_code: ReferralCode,
        referred_by: Option<ReferralCode>,
    ) -> User {
        let id = self.next_id;
        self.next_id = id.next();

        let user = User {
            id,
            username,
            password,
            referral_code,
            referred_by,
            referrals: Vec::new(),
            earnings: 0,
        };
        self.users.insert(id, user.clone());
        user
    }

    pub fn find_by_id(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn find_by_credentials(&self, username: &Username, password: &Password) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.matches_credentials(username, password))
    }

    pub fn find_by_referral_code(&self, code: &ReferralCode) -> Option<&User> {
        self.users.values().find(|u| &u.referral_code == code)
    }

    /// Appends `referred` to the referrer's list and adds `bonus` to its earnings.
    /// Earnings saturate at `i64::MAX`.
    pub fn credit_referral(
        &mut self,
        referrer: UserId,
        referred: Username,
        bonus: u32,
    ) -> Option<&User> {
        let user = self.users.get_mut(&referrer)?;
        user.referrals.push(referred);
        user.earnings = user.earnings.saturating_add(i64::from(bonus));
        Some(user)
    }
}

#[derive(Clone, Default)]
pub struct Db(Arc<RwLock<UserStore>>);

impl Db {
    fn read(&self) -> Result<RwLockReadGuard<'_, UserStore>, DatabaseError> {
        self.0.read().map_err(|e| {
            tracing::error!("user store read lock poisoned >>> {}", e);
            DatabaseError::ServerError
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, UserStore>, DatabaseError> {
        self.0.write().map_err(|e| {
            tracing::error!("user store write lock poisoned >>> {}", e);
            DatabaseError::ServerError
        })
    }
}

pub fn get_user_by_id(db: &Db, id: UserId) -> Result<Option<User>, DatabaseError> {
    Ok(db.read()?.find_by_id(id).cloned())
}

pub fn get_user_by_credentials(
    db: &Db,
    username: &Username,
    password: &Password,
) -> Result<Option<User>, DatabaseError> {
    Ok(db.read()?.find_by_credentials(username, password).cloned())
}

pub fn get_user_by_referral_code(
    db: &Db,
    code: &ReferralCode,
) -> Result<Option<User>, DatabaseError> {
    Ok(db.read()?.find_by_referral_code(code).cloned())
}

/// Generates a referral code not held by any user and inserts the new user under
/// the same write lock, so two registrations can never race onto one code.
pub fn create_new_user(
    db: &Db,
    username: Username,
    password: Password,
    referred_by: Option<ReferralCode>,
    max_code_attempts: u32,
) -> Result<User, DatabaseError> {
    let mut store = db.write()?;

    let referral_code = (0..max_code_attempts.max(1))
        .map(|_| ReferralCode::generate())
        .find(|code| store.find_by_referral_code(code).is_none())
        .ok_or_else(|| {
            tracing::error!(
                "no free referral code after {} attempts",
                max_code_attempts
            );
            DatabaseError::ReferralCodeExhausted
        })?;

    Ok(store.insert(username, password, referral_code, referred_by))
}

pub struct ReferralCredit {
    pub referrer: User,
    pub referred_user: User,
}

/// Resolves both sides and credits the referrer in one write-locked step.
/// Returns `None` when either the acting user or the code is unknown.
pub fn apply_referral(
    db: &Db,
    user_id: UserId,
    code: &ReferralCode,
    bonus: u32,
) -> Result<Option<ReferralCredit>, DatabaseError> {
    let mut store = db.write()?;

    let referred_user = match store.find_by_id(user_id) {
        Some(u) => u.clone(),
        None => return Ok(None),
    };
    let referrer_id = match store.find_by_referral_code(code) {
        Some(u) => u.id,
        None => return Ok(None),
    };

    let referrer = store
        .credit_referral(referrer_id, referred_user.username.clone(), bonus)
        .cloned();

    Ok(referrer.map(|referrer| ReferralCredit {
        referrer,
        referred_user,
    }))
}

pub fn count_users(db: &Db) -> Result<usize, DatabaseError> {
    Ok(db.read()?.users.len())
}
