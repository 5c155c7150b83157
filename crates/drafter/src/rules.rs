//! Ordered first-match rule evaluation
//!
//! Each resolver is a list of named rules tried in order; the first rule that
//! yields a value decides the outcome.

/// A named decision rule
pub struct Rule<I: ?Sized, T> {
    pub name: &'static str,
    pub apply: fn(&I) -> Option<T>,
}

impl<I: ?Sized, T> Rule<I, T> {
    pub const fn new(name: &'static str, apply: fn(&I) -> Option<T>) -> Self {
        Self { name, apply }
    }
}

/// Evaluate `rules` in order and return the first value with the name of the
/// rule that produced it
pub fn first_match<I: ?Sized, T>(rules: &[Rule<I, T>], input: &I) -> Option<(&'static str, T)> {
    rules.iter().find_map(|rule| {
        let value = (rule.apply)(input)?;
        tracing::debug!(rule = rule.name, "rule matched");
        Some((rule.name, value))
    })
}
