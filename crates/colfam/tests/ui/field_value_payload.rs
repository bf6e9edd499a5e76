use colfam::prelude::*;

#[derive(FieldValue)]
enum Size {
    Small,
    Big(u8),
}

fn main() {}
