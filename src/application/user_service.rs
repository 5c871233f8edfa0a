use std::sync::Arc;

use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::TokenService;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, Role, UserView, USERNAME_MAX_CHARS};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<UserView, DomainError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::InvalidInput("username must not be empty".to_string()));
        }
        if username.chars().count() > USERNAME_MAX_CHARS {
            return Err(DomainError::InvalidInput(format!(
                "username must be at most {} characters",
                USERNAME_MAX_CHARS
            )));
        }
        if password.is_empty() {
            return Err(DomainError::InvalidInput("password must not be empty".to_string()));
        }

        let user = self.repo.create(NewUser {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role,
        })?;

        log::info!("registered user {} ({})", user.id, user.role);
        Ok(user.into())
    }

    /// Returns a fresh session token for the matching user.
    pub fn login(&self, identifier: &str, password: &str) -> Result<String, DomainError> {
        let Some(user) = self.repo.find_by_identifier(identifier)? else {
            log::warn!("login rejected: no user matches '{}'", identifier);
            return Err(DomainError::InvalidCredentials("User not found".to_string()));
        };

        if !verify_password(password, &user.password_hash) {
            log::warn!("login rejected: bad password for user {}", user.id);
            return Err(DomainError::InvalidCredentials("Invalid password".to_string()));
        }

        self.tokens
            .issue(user.id, user.role)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    pub fn list_users(&self) -> Result<Vec<UserView>, DomainError> {
        Ok(self.repo.list()?.into_iter().map(UserView::from).collect())
    }

    pub fn get_user(&self, id: Uuid) -> Result<UserView, DomainError> {
        self.repo
            .find_by_id(id)?
            .map(UserView::from)
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_token_service, InMemoryStore};

    fn service() -> (UserService, Arc<TokenService>) {
        let tokens = test_token_service();
        (UserService::new(InMemoryStore::new(), tokens.clone()), tokens)
    }

    #[test]
    fn register_hashes_password_and_hides_it() {
        let store = InMemoryStore::new();
        let service = UserService::new(store.clone(), test_token_service());

        let user = service
            .register("rina", "rahasia", Role::Buyer)
            .expect("register failed");

        assert_eq!(user.username, "rina");
        assert_eq!(user.role, Role::Buyer);
        let stored = store.users.lock().unwrap()[0].password_hash.clone();
        assert_ne!(stored, "rahasia");
        assert!(verify_password("rahasia", &stored));
    }

    #[test]
    fn register_rejects_blank_username() {
        let (service, _) = service();
        assert!(matches!(
            service.register("  ", "pw", Role::Buyer),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn register_rejects_overlong_username() {
        let store = InMemoryStore::new();
        let service = UserService::new(store.clone(), test_token_service());

        assert!(service
            .register(&"é".repeat(USERNAME_MAX_CHARS), "pw", Role::Buyer)
            .is_ok());
        assert!(matches!(
            service.register(&"a".repeat(USERNAME_MAX_CHARS + 1), "pw", Role::Buyer),
            Err(DomainError::InvalidInput(_))
        ));
        assert_eq!(store.users.lock().unwrap().len(), 1);
    }

    #[test]
    fn register_rejects_duplicate_username() {
        let (service, _) = service();
        service
            .register("joko", "pw", Role::Seller)
            .expect("first register failed");
        assert!(matches!(
            service.register("joko", "pw2", Role::Buyer),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn login_by_username_issues_verifiable_token() {
        let (service, tokens) = service();
        let user = service
            .register("ayu", "pw", Role::Seller)
            .expect("register failed");

        let token = service.login("ayu", "pw").expect("login failed");
        let identity = tokens.verify(&token).expect("token should verify");

        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role, Role::Seller);
    }

    #[test]
    fn login_by_id_is_accepted() {
        let (service, _) = service();
        let user = service
            .register("tono", "pw", Role::Buyer)
            .expect("register failed");

        assert!(service.login(&user.id.to_string(), "pw").is_ok());
    }

    #[test]
    fn login_with_unknown_user_fails() {
        let (service, _) = service();
        let err = service.login("ghost", "pw").unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials(ref m) if m == "User not found"));
    }

    #[test]
    fn login_with_wrong_password_fails() {
        let (service, _) = service();
        service
            .register("wati", "pw", Role::Buyer)
            .expect("register failed");

        let err = service.login("wati", "nope").unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials(ref m) if m == "Invalid password"));
    }

    #[test]
    fn get_unknown_user_is_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.get_user(Uuid::new_v4()),
            Err(DomainError::NotFound(_))
        ));
    }
}
