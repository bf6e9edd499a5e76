use colfam::prelude::*;

#[derive(FieldValue)]
struct Level(u8);

fn main() {}
