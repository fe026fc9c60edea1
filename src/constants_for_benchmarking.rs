pub const LOAD_MANY: usize = 10_000;

pub const GET_MANY: usize = 10_000;

pub const CONTENDED_CALLERS: usize = 64;
