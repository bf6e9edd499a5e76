use colfam::prelude::*;

#[derive(Record)]
struct Pair(u64, String);

fn main() {}
