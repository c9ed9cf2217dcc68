use romeotag_core::{PolicyLookup, Publisher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    Single(&'a Publisher),
    NoDecision { candidates: usize },
}

/// Only an unambiguous, single publisher is acted upon.
pub fn decide(lookup: &PolicyLookup) -> Decision<'_> {
    match lookup.publishers.as_slice() {
        [publisher] => Decision::Single(publisher),
        others => Decision::NoDecision {
            candidates: others.len(),
        },
    }
}
