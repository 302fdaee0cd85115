use macroquad::{
    camera::{set_camera, Camera2D},
    math::Rect,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod draw;

/// World coordinates used by every scenario: x right, y down.
pub const WORLD_WIDTH: f32 = 128.0;
pub const WORLD_HEIGHT: f32 = 72.0;

pub fn setup() {
    let fmt_layer = fmt::layer().compact();
    let filter_layer = EnvFilter::from_default_env();
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .init();
    let camera = Camera2D::from_display_rect(Rect::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT));
    set_camera(&camera);
}
