pub mod time;

/// Short random id used to disambiguate colliding node and edge ids.
pub fn shortid() -> String {
    nanoid::nanoid!(6)
}
