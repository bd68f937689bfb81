//! Business logic
//!
//! Services are built once at startup from the repository set and the
//! cipher, then shared with the handlers through `web::Data`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::AppServices;
//!
//! let services = AppServices::new(Repositories::in_memory(), cipher, TokenService::from_config(), 4);
//! let user = services.users.get_user_by_id(&id).await?;
//! ```

use std::sync::Arc;

use actix_web::web;

use crate::repositories::Repositories;

pub mod accounts;
pub mod auth;
pub mod crypto;
pub mod ledger;
pub mod users;

use accounts::AccountService;
use auth::TokenService;
use crypto::FieldCipher;
use ledger::LedgerService;
use users::UserService;

/// Every service, wrapped for registration as application data.
#[derive(Clone)]
pub struct AppServices {
    pub users: web::Data<UserService>,
    pub accounts: web::Data<AccountService>,
    pub ledger: web::Data<LedgerService>,
    pub tokens: web::Data<TokenService>,
}

impl AppServices {
    pub fn new(repositories: Repositories, cipher: FieldCipher, tokens: TokenService, bcrypt_cost: u32) -> Self {
        let cipher = Arc::new(cipher);

        Self {
            users: web::Data::new(UserService::new(repositories.users.clone(), cipher, bcrypt_cost)),
            accounts: web::Data::new(AccountService::new(
                repositories.accounts.clone(),
                repositories.users.clone(),
            )),
            ledger: web::Data::new(LedgerService::new(repositories.accounts, repositories.ledger)),
            tokens: web::Data::new(tokens),
        }
    }

    /// Registers every service on an app or scope.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.users.clone())
            .app_data(self.accounts.clone())
            .app_data(self.ledger.clone())
            .app_data(self.tokens.clone());
    }
}
