//! User record helpers.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::{
    context::{Role, Viewer},
    models::User,
};

/// Look up a user record by username.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_user_by_name(conn: &mut DbConnection, name: &str) -> QueryResult<Option<User>> {
    use crate::schema::users::dsl::{username, users};
    users
        .filter(username.eq(name))
        .select(User::as_select())
        .first::<User>(conn)
        .await
        .optional()
}

/// Look up a user record by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_user(conn: &mut DbConnection, user_id: i32) -> QueryResult<Option<User>> {
    use crate::schema::users::dsl::{id, users};
    users
        .filter(id.eq(user_id))
        .select(User::as_select())
        .first::<User>(conn)
        .await
        .optional()
}

/// Insert a new user record and return its id.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_user(
    conn: &mut DbConnection,
    user: &crate::models::NewUser<'_>,
) -> QueryResult<i32> {
    use crate::schema::users::dsl::{id, users};
    diesel::insert_into(users)
        .values(user)
        .returning(id)
        .get_result(conn)
        .await
}

impl User {
    /// The resolved identity this account represents.
    #[must_use]
    pub fn as_viewer(&self) -> Viewer {
        Viewer {
            id: self.id,
            username: self.username.clone(),
            role: Role::from_code(&self.role),
        }
    }
}
