//! Account management command handlers

use anyhow::Context;

use crate::config::Config;
use crate::db::{NewUser, Store};
use crate::domain::Role;

pub async fn cmd_create_admin(
    config: &Config,
    email: &str,
    name: &str,
    password: &str,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let email = email.trim().to_lowercase();

    if store.get_user_by_email(&email).await?.is_some() {
        anyhow::bail!("An account with email {email} already exists");
    }

    let user = store
        .create_user(
            NewUser {
                email,
                name: name.trim().to_string(),
                phone: None,
                password: Some(password.to_string()),
                role: Role::Admin,
            },
            &config.security,
        )
        .await
        .context("Failed to create admin account")?;

    println!("Created admin {} ({})", user.email, user.id);
    println!("API key: {}", user.api_key);
    Ok(())
}

pub async fn cmd_promote(config: &Config, email: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let email = email.trim().to_lowercase();

    if store.set_user_role(&email, Role::Admin).await? {
        println!("{email} is now an administrator");
    } else {
        println!("No account with email {email}");
    }
    Ok(())
}
