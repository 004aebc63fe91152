//! Seams between route generation and the host router.

/// Answers whether a named route or helper exists in the host.
///
/// Closures taking `&str` implement the trait, so a host can pass a lookup
/// over whatever registry it maintains.
pub trait CapabilityProbe {
    /// Returns `true` when a route or helper named `candidate` exists.
    fn exists(&self, candidate: &str) -> bool;
}

impl<F> CapabilityProbe for F
where
    F: Fn(&str) -> bool + ?Sized,
{
    fn exists(&self, candidate: &str) -> bool {
        self(candidate)
    }
}

/// Host registry consulted and updated while generating variants.
pub trait RouteRegistry {
    /// Returns `true` when a route named `name` is already registered.
    fn has_route_name(&self, name: &str) -> bool;

    /// Records `base_name` as a route whose helpers dispatch to locale
    /// variants.
    fn add_localized_helper(&mut self, base_name: &str);
}
