//! CLI command handlers over the session facade.

use std::sync::Arc;

use crate::client::HttpStoreClient;
use crate::session::SessionAuthenticator;
use crate::store::{keys, CredentialStore, FileCredentialStore};

use super::LoginArgs;

fn authenticator() -> Result<(Arc<FileCredentialStore>, SessionAuthenticator), Box<dyn std::error::Error>>
{
    let store = Arc::new(FileCredentialStore::open_default()?);
    let auth = SessionAuthenticator::new(store.clone(), Arc::new(HttpStoreClient::new()));
    Ok((store, auth))
}

/// Handle `kiosk login <identity> [-s secret]`.
pub async fn handle_login(args: &LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let secret = match &args.secret {
        Some(secret) => secret.clone(),
        None => match std::env::var("KIOSK_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                eprintln!("No secret given; pass -s or set KIOSK_SECRET");
                std::process::exit(1);
            }
        },
    };
    let (_store, auth) = authenticator()?;
    auth.login(&args.identity, &secret).await?;
    println!("Logged in as {}", args.identity);
    Ok(())
}

/// Handle `kiosk silent-login`.
pub async fn handle_silent_login() -> Result<(), Box<dyn std::error::Error>> {
    let (store, auth) = authenticator()?;
    auth.login_silent().await?;
    let identity = store.get(keys::IDENTITY).unwrap_or_default();
    println!("Logged in as {identity}");
    Ok(())
}

/// Handle `kiosk refresh`.
pub async fn handle_refresh() -> Result<(), Box<dyn std::error::Error>> {
    let (_store, auth) = authenticator()?;
    auth.refresh_token().await?;
    println!("Session token refreshed");
    Ok(())
}

/// Handle `kiosk status`.
pub async fn handle_status() -> Result<(), Box<dyn std::error::Error>> {
    let store = FileCredentialStore::open_default()?;
    match store.get(keys::IDENTITY) {
        Some(identity) => {
            let origin = if store.get_bool(keys::APP_PROVIDED_IDENTITY) {
                "app-provided"
            } else {
                "user"
            };
            println!("Identity:       {identity} ({origin})");
            println!(
                "Session token:  {}",
                if store.get(keys::SESSION_TOKEN).is_some() {
                    "present"
                } else {
                    "absent"
                }
            );
            if let Some(source) = store.get(keys::LAST_BOOTSTRAP_SOURCE) {
                println!("Last source:    {source}");
            }
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

/// Handle `kiosk logout`.
pub async fn handle_logout() -> Result<(), Box<dyn std::error::Error>> {
    let (_store, auth) = authenticator()?;
    auth.logout().await;
    println!("Logged out");
    Ok(())
}
