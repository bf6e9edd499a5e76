use colfam::prelude::*;

#[derive(Record)]
enum Shape {
    Circle,
}

fn main() {}
