use macroquad::{time::get_frame_time, window::next_frame};
use rigid2d::scenarios::{Scenario, Springs};
use rigid2d::Space;

mod shared;
use shared::draw::Draw;

struct GameState {
    space: Space,
}

impl GameState {
    fn update(&mut self) {
        let dt = (get_frame_time() as f64).min(1.0 / 30.0);
        self.space.step(dt);
    }

    fn render(&self) {
        self.space.draw();
    }
}

#[macroquad::main("springs")]
async fn main() {
    shared::setup();
    let mut state = GameState {
        space: Springs::default().create(),
    };

    loop {
        state.update();
        state.render();
        next_frame().await;
    }
}
