//! Auth command handlers (login, logout, whoami, register).

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use leadctl_core::api::ApiClient;
use leadctl_core::api::types::{LoginRequest, RegisterRequest};
use leadctl_core::session;
use leadctl_core::store::SessionStore;

pub async fn login(client: &ApiClient, session_path: &Path, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = prompt("Password: ")?;
    if email.is_empty() || password.is_empty() {
        anyhow::bail!("Email and password are required.");
    }

    let credentials = LoginRequest { email, password };
    let user = session::login(client, session_path, &credentials)
        .await
        .context("login failed")?;

    println!("Logged in as {} <{}>.", user.name, user.email);
    Ok(())
}

pub async fn logout(client: &ApiClient, session_path: &Path) -> Result<()> {
    let store = SessionStore::load_from(session_path)?;
    let Some(token) = store.token else {
        println!("Not logged in.");
        return Ok(());
    };

    client.set_token(Some(token));
    session::logout(client, session_path).await?;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(client: &ApiClient, session_path: &Path) -> Result<()> {
    match session::bootstrap(client, session_path).await? {
        Some(user) => println!("Logged in as {} <{}>.", user.name, user.email),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub async fn register(client: &ApiClient) -> Result<()> {
    let name = prompt("Name: ")?;
    let email = prompt("Email: ")?;
    let password = prompt("Password: ")?;
    let password_confirmation = prompt("Confirm password: ")?;

    if name.is_empty() || email.is_empty() || password.is_empty() {
        anyhow::bail!("Name, email and password are required.");
    }
    if password != password_confirmation {
        anyhow::bail!("Passwords do not match.");
    }

    let request = RegisterRequest {
        name,
        email,
        password,
        password_confirmation,
    };
    client
        .register(&request)
        .await
        .context("registration failed")?;

    println!("Account created. You can now log in.");
    Ok(())
}

/// Installs the persisted token on the client, failing when none is stored.
pub fn require_session(client: &ApiClient, session_path: &Path) -> Result<()> {
    let store = SessionStore::load_from(session_path)?;
    let Some(token) = store.token else {
        anyhow::bail!("Not logged in. Run `leadctl login` first.");
    };
    client.set_token(Some(token));
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    std::io::stderr().flush().context("flush prompt")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("read input")?;
    Ok(line.trim().to_string())
}
