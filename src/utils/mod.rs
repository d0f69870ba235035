pub mod assets;
pub mod avatar;
pub mod card;
pub mod chart;
pub mod wynncraft;
