use anyhow::{Result, bail};
use nasta_tag_core::favorites::FavoritesStore;
use nasta_tag_core::position::{self, PositionSender};
use nasta_tag_transit::identifiers::{StopKey, UserIdentifier};
use nasta_tag_transit::models::Coordinates;
use tracing::{info, warn};

/// One line of stdin input
#[derive(Debug, PartialEq)]
pub enum Command {
    Position(Coordinates),
    ToggleFavorite(StopKey),
    Login(UserIdentifier),
    Logout,
}

impl Command {
    /// Blank lines parse to `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let command = match (word, rest) {
            ("fav", "") | ("login", "") => bail!("`{word}` needs an argument"),
            ("fav", key) => Self::ToggleFavorite(StopKey::new(key)),
            ("login", user) => Self::Login(UserIdentifier::new(user)),
            ("logout", "") => Self::Logout,
            _ => Self::Position(position::parse_reading(line)?),
        };
        Ok(Some(command))
    }
}

/// Apply a stdin line. Failures are logged; the board keeps running.
pub async fn handle(line: &str, positions: &PositionSender, favorites: &mut FavoritesStore) {
    let command = match Command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return,
        Err(e) => {
            warn!(error = %e, "ignoring input");
            return;
        }
    };

    match command {
        Command::Position(position) => {
            positions.update(position);
        }
        Command::ToggleFavorite(key) => match favorites.toggle(&key).await {
            Ok(current) => info!(%key, favorite = current.contains(&key), "favorite toggled"),
            Err(e) => warn!(%key, error = %e, "favorite toggled but not saved"),
        },
        Command::Login(user) => match favorites.sign_in(user.clone()).await {
            Ok(current) => info!(%user, favorites = current.len(), "login complete"),
            Err(e) if favorites.user() == Some(&user) => {
                warn!(%user, error = %e, "signed in, but merged favorites were not saved")
            }
            Err(e) => warn!(%user, error = %e, "login failed"),
        },
        Command::Logout => favorites.sign_out(),
    }
}
