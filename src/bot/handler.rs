use crate::config::Config;
use crate::utils::assets::AssetStore;
use crate::utils::avatar::AvatarClient;
use crate::utils::card::palette::Palette;
use crate::utils::wynncraft::Wynncraft;

/// Shared, read-only state handed to every command.
pub struct Handler {
    pub config: Config,
    pub wynncraft: Wynncraft,
    pub avatars: AvatarClient,
    pub assets: AssetStore,
    pub palette: Palette,
}

impl Handler {
    pub fn new(config: Config) -> Self {
        Handler {
            wynncraft: Wynncraft::new(config.api_base.clone()),
            avatars: AvatarClient::new(config.avatar_base.clone()),
            assets: AssetStore::new(config.assets_dir.clone()),
            palette: Palette::default(),
            config,
        }
    }
}
