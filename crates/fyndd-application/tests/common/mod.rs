//! Fake API implementations shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use fyndd_core::auth::{
    AuthApi, AuthSession, Credentials, OtpVerification, PasswordReset, SignupRequest,
};
use fyndd_core::cart::{Cart, CartApi, CartItem, FriendCart};
use fyndd_core::clock::ManualClock;
use fyndd_core::friend::{FriendsApi, UserId, UserSummary};
use fyndd_core::product::ProductId;
use fyndd_core::state::ClientStateStore;
use fyndd_core::{FynddError, Result};
use fyndd_infrastructure::{MemoryStore, StoredSessionStore};

pub const HOUR_MS: i64 = 60 * 60 * 1000;

pub fn user(id: &str) -> UserSummary {
    UserSummary {
        id: UserId::from(id),
        name: format!("user {}", id),
        email: format!("{}@example.com", id),
        avatar: String::new(),
    }
}

pub fn memory_state() -> (ClientStateStore, Arc<MemoryStore>) {
    let memory = Arc::new(MemoryStore::new());
    (ClientStateStore::new(memory.clone()), memory)
}

pub fn session_store(state: &ClientStateStore) -> Arc<StoredSessionStore> {
    Arc::new(StoredSessionStore::new(state.clone()))
}

pub fn clock_at(now_ms: i64) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(now_ms))
}

#[derive(Default)]
pub struct FakeFriendsApi {
    pub friends: Mutex<Vec<UserSummary>>,
    pub incoming: Mutex<Vec<UserSummary>>,
    pub search_hits: Mutex<Vec<UserSummary>>,
    pub fail_list: Mutex<Option<FynddError>>,
    pub remove_error: Mutex<Option<FynddError>>,
    pub sent: Mutex<Vec<UserId>>,
    pub rejected: Mutex<Vec<UserId>>,
}

impl FakeFriendsApi {
    pub fn set_friends(&self, ids: &[&str]) {
        *self.friends.lock().unwrap() = ids.iter().map(|id| user(id)).collect();
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl FriendsApi for FakeFriendsApi {
    async fn list_friends(&self) -> Result<Vec<UserSummary>> {
        if let Some(err) = self.fail_list.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.friends.lock().unwrap().clone())
    }

    async fn search_users(&self, _query: &str) -> Result<Vec<UserSummary>> {
        Ok(self.search_hits.lock().unwrap().clone())
    }

    async fn send_request(&self, user_id: &UserId) -> Result<()> {
        self.sent.lock().unwrap().push(user_id.clone());
        Ok(())
    }

    async fn accept_request(&self, user_id: &UserId) -> Result<()> {
        self.incoming.lock().unwrap().retain(|u| &u.id != user_id);
        self.friends.lock().unwrap().push(user(user_id.as_str()));
        Ok(())
    }

    async fn reject_request(&self, user_id: &UserId) -> Result<()> {
        self.rejected.lock().unwrap().push(user_id.clone());
        Ok(())
    }

    async fn remove_friend(&self, user_id: &UserId) -> Result<()> {
        if let Some(err) = self.remove_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.friends.lock().unwrap().retain(|u| &u.id != user_id);
        Ok(())
    }

    async fn incoming_requests(&self) -> Result<Vec<UserSummary>> {
        Ok(self.incoming.lock().unwrap().clone())
    }
}

pub fn cart_item(id: &str, price: f64, quantity: u32) -> CartItem {
    CartItem {
        product_id: ProductId::from(id),
        title: format!("Product {}", id),
        image_url: String::new(),
        price,
        quantity,
    }
}

#[derive(Default)]
pub struct FakeCartApi {
    pub items: Mutex<Vec<CartItem>>,
    pub fetches: AtomicUsize,
    pub adds: Mutex<Vec<(ProductId, u32)>>,
    /// Ids whose removal the server answers with 404.
    pub missing: Mutex<Vec<ProductId>>,
    pub reject_auth: Mutex<bool>,
}

impl FakeCartApi {
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CartApi for FakeCartApi {
    async fn fetch_cart(&self) -> Result<Cart> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Cart {
            items: self.items.lock().unwrap().clone(),
        })
    }

    async fn add_item(&self, product_id: &ProductId, quantity: u32) -> Result<()> {
        if *self.reject_auth.lock().unwrap() {
            return Err(FynddError::NotAuthenticated);
        }
        self.adds
            .lock()
            .unwrap()
            .push((product_id.clone(), quantity));
        self.items
            .lock()
            .unwrap()
            .push(cart_item(product_id.as_str(), 100.0, quantity));
        Ok(())
    }

    async fn remove_item(&self, product_id: &ProductId) -> Result<()> {
        if self.missing.lock().unwrap().contains(product_id) {
            return Err(FynddError::not_found("cart item", product_id.as_str()));
        }
        self.items
            .lock()
            .unwrap()
            .retain(|item| &item.product_id != product_id);
        Ok(())
    }

    async fn clear_cart(&self) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        if items.is_empty() {
            return Err(FynddError::not_found("cart", "current"));
        }
        items.clear();
        Ok(())
    }

    async fn friends_carts(&self) -> Result<Vec<FriendCart>> {
        Ok(vec![])
    }
}

#[derive(Default)]
pub struct FakeAuthApi {
    pub calls: AtomicUsize,
    pub token: Mutex<Option<String>>,
}

impl FakeAuthApi {
    pub fn with_token(token: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            token: Mutex::new(Some(token.to_string())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn session(&self) -> Result<AuthSession> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let token = self
            .token
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| FynddError::validation("credentials", "Invalid email or password."))?;
        Ok(AuthSession {
            token,
            user: Some(user("me")),
        })
    }

    fn ok(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn signup(&self, request: &SignupRequest) -> Result<String> {
        self.ok()?;
        Ok(format!("OTP sent to {}", request.email))
    }

    async fn verify_otp(&self, _verification: &OtpVerification) -> Result<AuthSession> {
        self.session()
    }

    async fn resend_otp(&self, _email: &str) -> Result<()> {
        self.ok()
    }

    async fn login(&self, _credentials: &Credentials) -> Result<AuthSession> {
        self.session()
    }

    async fn forgot_password(&self, _email: &str) -> Result<()> {
        self.ok()
    }

    async fn verify_reset_otp(&self, _verification: &OtpVerification) -> Result<()> {
        self.ok()
    }

    async fn reset_password(&self, _reset: &PasswordReset) -> Result<()> {
        self.ok()
    }

    async fn profile(&self) -> Result<UserSummary> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(user("me"))
    }
}
