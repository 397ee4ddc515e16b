//! Administrative command handlers.
//!
//! These helpers stay free of transport dependencies so any future server
//! runtime can reuse them alongside the standalone admin binary.

#![allow(
    clippy::print_stdout,
    reason = "intentional user output for CLI commands"
)]

use anyhow::{Context, Result, anyhow};
use argon2::{
    Algorithm,
    Argon2,
    ParamsBuilder,
    Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use diesel_async::AsyncConnection;

use crate::{
    cli::{AppConfig, Commands, CreateUserArgs},
    context::Role,
    db::{DbConnection, apply_migrations, create_user},
    models::NewUser,
};

/// Execute an administrative command.
///
/// # Errors
///
/// Propagates failures from configuration merging or database operations.
pub async fn run_command(command: Commands, cfg: &AppConfig) -> Result<()> {
    match command {
        Commands::CreateUser(args) => {
            let args = ortho_config::load_and_merge_subcommand_for::<CreateUserArgs>(&args)?;
            run_create_user(args, cfg).await
        }
        Commands::Migrate => run_migrate(cfg).await,
    }
}

/// Build an Argon2 instance using the supplied configuration parameters.
///
/// # Errors
///
/// Returns any error emitted while constructing the Argon2 parameter set.
pub fn argon2_from_config(cfg: &AppConfig) -> Result<Argon2<'static>> {
    let params = ParamsBuilder::new()
        .m_cost(cfg.argon2_m_cost)
        .t_cost(cfg.argon2_t_cost)
        .p_cost(cfg.argon2_p_cost)
        .build()
        .with_context(|| {
            format!(
                "invalid Argon2 params derived from config: m_cost={}, t_cost={}, p_cost={}",
                cfg.argon2_m_cost, cfg.argon2_t_cost, cfg.argon2_p_cost
            )
        })?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password with the configured Argon2 instance.
///
/// # Errors
///
/// Returns any error produced by the password hasher.
pub fn hash_password(argon2: &Argon2, pw: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = argon2
        .hash_password(pw.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?;
    Ok(hashed.to_string())
}

/// Verify a password against a stored hash string.
#[must_use]
pub fn verify_password(hash: &str, pw: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(pw.as_bytes(), &parsed)
            .is_ok()
    })
}

fn parse_role(code: Option<&str>) -> Result<Role> {
    match code {
        None => Ok(Role::User),
        Some(code) => match code.to_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "AUTHOR" => Ok(Role::Author),
            "ADMIN" => Ok(Role::Admin),
            other => Err(anyhow!("unknown role code '{other}'")),
        },
    }
}

async fn run_create_user(args: CreateUserArgs, cfg: &AppConfig) -> Result<()> {
    let username = args.username.ok_or_else(|| anyhow!("missing username"))?;
    let password = args.password.ok_or_else(|| anyhow!("missing password"))?;
    let role = parse_role(args.role.as_deref())?;

    let argon2 = argon2_from_config(cfg)?;
    let hashed = hash_password(&argon2, &password)?;
    let new_user = NewUser {
        username: &username,
        password: &hashed,
        role: role.as_str(),
    };
    let mut conn = DbConnection::establish(&cfg.database).await?;
    apply_migrations(&mut conn, &cfg.database).await?;
    create_user(&mut conn, &new_user)
        .await
        .with_context(|| format!("failed to create user '{username}'"))?;
    println!("User {username} created with role {}", role.as_str());
    Ok(())
}

async fn run_migrate(cfg: &AppConfig) -> Result<()> {
    let mut conn = DbConnection::establish(&cfg.database).await?;
    apply_migrations(&mut conn, &cfg.database).await?;
    println!("Migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn argon2_respects_config_overrides() {
        let cfg = AppConfig {
            argon2_m_cost: 1024,
            argon2_t_cost: 5,
            argon2_p_cost: 3,
            ..AppConfig::default()
        };

        let argon2 = argon2_from_config(&cfg).expect("argon2");

        let params = argon2.params();
        assert_eq!(params.m_cost(), cfg.argon2_m_cost);
        assert_eq!(params.t_cost(), cfg.argon2_t_cost);
        assert_eq!(params.p_cost(), cfg.argon2_p_cost);
    }

    #[rstest]
    fn hash_then_verify_round_trip() {
        let argon2 = Argon2::default();
        let hashed = hash_password(&argon2, "secret").expect("hash");
        assert!(verify_password(&hashed, "secret"));
        assert!(!verify_password(&hashed, "wrong"));
    }

    #[rstest]
    #[case(None, Role::User)]
    #[case(Some("author"), Role::Author)]
    #[case(Some("ADMIN"), Role::Admin)]
    fn role_codes_parse(#[case] code: Option<&str>, #[case] expected: Role) {
        assert_eq!(parse_role(code).expect("role"), expected);
    }

    #[cfg(feature = "sqlite")]
    #[rstest]
    #[tokio::test]
    async fn create_user_persists_a_hashed_account() {
        use argon2::Params;

        let dir = tempfile::tempdir().expect("tempdir");
        let database = dir.path().join("admin.db").to_string_lossy().into_owned();
        let cfg = AppConfig {
            database,
            argon2_m_cost: Params::DEFAULT_M_COST,
            argon2_t_cost: Params::DEFAULT_T_COST,
            argon2_p_cost: Params::DEFAULT_P_COST,
        };
        let args = CreateUserArgs {
            username: Some("root".into()),
            password: Some("secret".into()),
            role: Some("admin".into()),
        };

        run_command(Commands::CreateUser(args), &cfg)
            .await
            .expect("create user");

        let mut conn = DbConnection::establish(&cfg.database).await.expect("connect");
        let user = crate::db::get_user_by_name(&mut conn, "root")
            .await
            .expect("query")
            .expect("account present");
        assert_eq!(user.role, "ADMIN");
        assert!(verify_password(&user.password, "secret"));
    }

    #[rstest]
    #[case(None, Some("password".into()), "missing username")]
    #[case(Some("user".into()), None, "missing password")]
    #[tokio::test]
    async fn create_user_rejects_missing_fields(
        #[case] username: Option<String>,
        #[case] password: Option<String>,
        #[case] expected: &str,
    ) {
        let cfg = AppConfig::default();
        let args = CreateUserArgs {
            username,
            password,
            role: None,
        };

        let err = run_command(Commands::CreateUser(args), &cfg)
            .await
            .expect_err("command must fail");
        assert!(err.to_string().contains(expected));
    }
}
