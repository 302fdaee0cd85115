use glam::DVec2;
use macroquad::color::{Color, DARKGRAY, GRAY, RED, WHITE};
use macroquad::shapes::{draw_circle_lines, draw_line};

use rigid2d::{RigidBody, RigidBodyType, ShapeKind, Space};

pub fn draw_vec_line(from: DVec2, to: DVec2, thickness: f32, color: Color) {
    let from = from.as_vec2();
    let to = to.as_vec2();
    draw_line(from.x, from.y, to.x, to.y, thickness, color)
}

pub trait Draw {
    fn draw(&self);
}

impl Draw for RigidBody {
    fn draw(&self) {
        let color = if self.body_type() == RigidBodyType::Static {
            GRAY
        } else if self.is_sleeping() {
            DARKGRAY
        } else {
            WHITE
        };
        let transform = self.transform();

        for shape in self.shapes() {
            match shape.kind() {
                ShapeKind::Circle { center, radius } => {
                    let world = transform.apply(*center);
                    let position = world.as_vec2();
                    draw_circle_lines(position.x, position.y, *radius as f32, 0.15, color);
                    // Orientation spoke so rotation is visible.
                    let arm = rigid2d::math::rotate(DVec2::X * *radius, self.angle());
                    draw_vec_line(world, world + arm, 0.15, color);
                }
                ShapeKind::Polygon(polygon) => {
                    let vertices = polygon.vertices();
                    for i in 0..vertices.len() {
                        let from = transform.apply(vertices[i]);
                        let to = transform.apply(vertices[(i + 1) % vertices.len()]);
                        draw_vec_line(from, to, 0.15, color);
                    }
                }
            }
        }
    }
}

impl Draw for Space {
    fn draw(&self) {
        for body in self.bodies() {
            body.draw();
        }
        // Contact normals, scaled by penetration.
        for pcp in self.contacts() {
            for contact in pcp.contacts() {
                if let Some(body) = self.body(pcp.body_a) {
                    let position = body.position() + contact.anchor_a;
                    draw_vec_line(position, position - pcp.normal * contact.separation, 0.2, RED);
                }
            }
        }
    }
}
