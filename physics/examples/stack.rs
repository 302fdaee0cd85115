use macroquad::{time::get_frame_time, window::next_frame};
use rigid2d::scenarios::{Scenario, Stack};
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

#[macroquad::main("stack")]
async fn main() {
    shared::setup();
    let mut space = Stack { base: 10 }.create();
    // Let the settled pyramid fall asleep; sleeping boxes draw darker.
    space.settings.sleeping = true;
    let mut state = GameState { space };

    loop {
        state.update();
        state.render();
        next_frame().await;
    }
}
