use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, User};
use crate::schema::users;

use super::models::{NewUserRow, UserRow};

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for DieselUserRepository {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: Uuid::new_v4(),
                username: &user.username,
                password_hash: &user.password_hash,
                role: user.role.as_str(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)?;

        row.try_into()
    }

    fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = match Uuid::parse_str(identifier) {
            Ok(id) => users::table
                .filter(users::username.eq(identifier).or(users::id.eq(id)))
                .select(UserRow::as_select())
                .first(&mut conn)
                .optional()?,
            Err(_) => users::table
                .filter(users::username.eq(identifier))
                .select(UserRow::as_select())
                .first(&mut conn)
                .optional()?,
        };

        row.map(User::try_from).transpose()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .select(UserRow::as_select())
            .order(users::created_at.asc())
            .load(&mut conn)?
            .into_iter()
            .map(User::try_from)
            .collect()
    }
}
