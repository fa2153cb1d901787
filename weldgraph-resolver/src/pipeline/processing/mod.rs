pub mod compatibility;
pub mod cooccurrence;
pub mod enhance;
pub mod normalize;
pub mod split;
pub mod trinity;
