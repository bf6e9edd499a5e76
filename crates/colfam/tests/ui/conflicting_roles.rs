use colfam::prelude::*;

#[derive(Record)]
struct Both {
    #[column(id, partition)]
    id: u64,
}

fn main() {}
