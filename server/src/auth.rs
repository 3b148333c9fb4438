use eyre::{eyre, Result};
use password_hash::{PasswordHash, PasswordVerifier};

use argon2::Argon2;
use pbkdf2::Pbkdf2;
use scrypt::Scrypt;

use base::setting::User;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, EntityTrait, IntoActiveModel};

#[derive(Debug, Clone)]
struct UserFields {
    username: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

fn try_local_login(users: &[User], username: &str, password: &str) -> Result<UserFields> {
    let user = users
        .iter()
        .find(|u| u.username == username)
        .ok_or(eyre!("No user with matching username found"))?
        .to_owned();
    let password_hash = PasswordHash::new(user.password.as_str())
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;
    let algs: &[&dyn PasswordVerifier] = &[&Argon2::default(), &Pbkdf2, &Scrypt];
    password_hash
        .verify_password(algs, password)
        .map_err(|e| eyre!("Password mismatch: {}", e))?;

    Ok(UserFields {
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
    })
}

async fn update_or_create<C>(db: &C, fields: UserFields) -> Result<entity::User>
where
    C: ConnectionTrait,
{
    let user = entity::UserEntity::find_by_id(fields.username.to_owned())
        .one(db)
        .await?;
    if let Some(user) = user {
        if user.first_name != fields.first_name || user.last_name != fields.last_name {
            tracing::trace!(?fields, "Updating user with new field values");
            let mut active_user = user.into_active_model();
            active_user.first_name = ActiveValue::Set(fields.first_name);
            active_user.last_name = ActiveValue::Set(fields.last_name);
            return Ok(active_user.update(db).await?);
        }
        Ok(user)
    } else {
        let user = entity::User {
            username: fields.username,
            first_name: fields.first_name,
            last_name: fields.last_name,
        };
        let user = user.into_active_model().insert(db).await?;
        Ok(user)
    }
}

/// Checks the credentials against the configured users and records the user
/// in the database on success.
pub async fn authenticate<C>(
    db: &C,
    users: &[User],
    username: &str,
    password: &str,
) -> Result<entity::User>
where
    C: ConnectionTrait,
{
    let fields = try_local_login(users, username, password)?;
    update_or_create(db, fields).await
}
