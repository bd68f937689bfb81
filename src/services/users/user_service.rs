//! # User service
//!
//! Registration, lookup and password verification.
//!
//! - passwords are bcrypt-hashed with the configured cost, off the async
//!   workers (`web::block`)
//! - `profile.identityNumber` is encrypted before it reaches the repository
//!   and decrypted on every read, single or paginated
//! - the password hash never leaves this service

use std::sync::Arc;
use std::time::Instant;

use actix_web::web;

use crate::domain::dto::common::{Page, PageRequest};
use crate::domain::dto::users::request::CreateUserRequest;
use crate::domain::dto::users::response::UserResponse;
use crate::domain::entities::users::{Profile, User};
use crate::errors::{AppError, AppResult};
use crate::repositories::UserRepository;
use crate::services::crypto::FieldCipher;

pub const USER_NOT_FOUND: &str = "User not found";
pub const INVALID_PASSWORD: &str = "Invalid password";

pub struct UserService {
    users: Arc<dyn UserRepository>,
    cipher: Arc<FieldCipher>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, cipher: Arc<FieldCipher>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            cipher,
            bcrypt_cost,
        }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        let CreateUserRequest {
            name,
            email,
            password,
            profile,
        } = request;

        let password_hash = self.hash_password(password).await?;

        let identity_number = profile.identity_number;
        let profile = Profile {
            identity_type: profile.identity_type,
            identity_number: self.cipher.encrypt(&identity_number),
            address: profile.address,
        };

        let user = self
            .users
            .create(User::new(name, email, password_hash, profile))
            .await?;
        log::info!("User {} created", user.id);

        Ok(UserResponse::from_user(user, identity_number))
    }

    pub async fn get_user_by_id(&self, id: &str) -> AppResult<UserResponse> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

        self.to_response(user)
    }

    pub async fn list_users(&self, page: PageRequest) -> AppResult<Page<UserResponse>> {
        self.users
            .list(page)
            .await?
            .try_map(|user| self.to_response(user))
    }

    /// Returns the user if `password` matches the stored hash.
    pub async fn verify_password(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

        let verify_start = Instant::now();
        let password = password.to_string();
        let password_hash = user.password_hash.clone();
        let is_valid = web::block(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| AppError::InternalError(format!("Password verification aborted: {}", e)))?
            .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;
        log::debug!("Password verification took: {:?}", verify_start.elapsed());

        if !is_valid {
            log::warn!("Invalid password for user {}", user.id);
            return Err(AppError::AuthenticationError(INVALID_PASSWORD.to_string()));
        }

        Ok(user)
    }

    async fn hash_password(&self, password: String) -> AppResult<String> {
        let cost = self.bcrypt_cost;
        let hash_start = Instant::now();

        let password_hash = web::block(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::InternalError(format!("Password hashing aborted: {}", e)))?
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

        log::debug!("Password hashing took: {:?}", hash_start.elapsed());
        Ok(password_hash)
    }

    fn to_response(&self, user: User) -> AppResult<UserResponse> {
        let identity_number = self.cipher.decrypt(&user.profile.identity_number)?;
        Ok(UserResponse::from_user(user, identity_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dto::users::request::ProfileRequest;
    use crate::repositories::memory::MemoryStore;

    const KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    fn service() -> (UserService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let cipher = Arc::new(FieldCipher::new(KEY).unwrap());
        (UserService::new(store.clone(), cipher, 4), store)
    }

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "Alice".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            profile: ProfileRequest {
                identity_type: "KTP".to_string(),
                identity_number: "1234567890123456".to_string(),
                address: "Jakarta".to_string(),
            },
        }
    }

    #[actix_web::test]
    async fn test_identity_number_encrypted_at_rest() {
        let (service, store) = service();

        let first = service.create_user(request("a@example.com")).await.unwrap();
        service.create_user(request("b@example.com")).await.unwrap();
        assert_eq!(first.profile.identity_number, "1234567890123456");

        let stored_first = store.find_by_email("a@example.com").await.unwrap().unwrap();
        let stored_second = store.find_by_email("b@example.com").await.unwrap().unwrap();
        assert_ne!(stored_first.profile.identity_number, "1234567890123456");
        assert_ne!(stored_first.profile.identity_number, stored_second.profile.identity_number);

        let read_back = service.get_user_by_id(&first.id).await.unwrap();
        assert_eq!(read_back.profile.identity_number, "1234567890123456");
    }

    #[actix_web::test]
    async fn test_password_is_hashed() {
        let (service, store) = service();
        service.create_user(request("a@example.com")).await.unwrap();

        let stored = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret123");
        assert!(bcrypt::verify("secret123", &stored.password_hash).unwrap());
    }

    #[actix_web::test]
    async fn test_list_decrypts_every_user() {
        let (service, _) = service();
        for i in 0..3 {
            service.create_user(request(&format!("{}@example.com", i))).await.unwrap();
        }

        let page = service.list_users(PageRequest { page: 1, limit: 10 }).await.unwrap();
        assert_eq!(page.total, 3);
        assert!(page.items.iter().all(|u| u.profile.identity_number == "1234567890123456"));
    }

    #[actix_web::test]
    async fn test_verify_password_outcomes() {
        let (service, _) = service();
        service.create_user(request("a@example.com")).await.unwrap();

        assert!(service.verify_password("a@example.com", "secret123").await.is_ok());

        let err = service.verify_password("a@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::AuthenticationError(_)));

        let err = service.verify_password("nobody@example.com", "secret123").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn test_unknown_user_is_not_found() {
        let (service, _) = service();
        let err = service.get_user_by_id("65f000000000000000000000").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
