mod hud;
mod overlay;
mod toolbar;
