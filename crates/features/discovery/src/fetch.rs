use eco_catalog::FetchError;
use std::fmt;
use tracing::{debug, warn};

/// The independent fetch keys of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKey {
    Regions,
    Localities,
    Items,
    Points,
    Point,
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Regions => "regions",
            Self::Localities => "localities",
            Self::Items => "items",
            Self::Points => "points",
            Self::Point => "point",
        })
    }
}

/// What happened to a requested fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The response replaced the state.
    Applied,
    /// A newer request (or an invalidation) superseded this one; the response was dropped.
    Stale,
    /// Nothing was sent: the same request is in flight or the data is already loaded.
    Skipped,
    /// The request failed; the previous state was kept.
    Failed,
}

impl Refresh {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Generation-counted slot guarding one fetch key.
///
/// `P` is the request parameter (region code, point id, ...). Beginning a request
/// with different parameters, or invalidating the slot, bumps the generation so
/// late responses of older requests are recognized and dropped.
#[derive(Debug)]
pub(crate) struct FetchSlot<P> {
    generation: u64,
    in_flight: Option<P>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Ticket<P> {
    generation: u64,
    param: P,
}

impl<P> Ticket<P> {
    pub(crate) const fn param(&self) -> &P {
        &self.param
    }
}

impl<P> Default for FetchSlot<P> {
    fn default() -> Self {
        Self { generation: 0, in_flight: None }
    }
}

impl<P: Clone + PartialEq> FetchSlot<P> {
    /// Starts a request, or returns `None` when the same request is already in flight.
    pub(crate) fn begin(&mut self, param: P) -> Option<Ticket<P>> {
        if self.in_flight.as_ref() == Some(&param) {
            return None;
        }
        self.generation += 1;
        self.in_flight = Some(param.clone());
        Some(Ticket { generation: self.generation, param })
    }

    /// Completes a request. `true` when its response may still be applied.
    pub(crate) fn settle(&mut self, ticket: &Ticket<P>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Drops whatever is in flight.
    pub(crate) fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }

    pub(crate) const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Applies a settled response, logging stale and failed outcomes.
pub(crate) fn conclude<T>(
    key: FetchKey,
    current: bool,
    result: Result<T, FetchError>,
    apply: impl FnOnce(T),
) -> Refresh {
    if !current {
        debug!(%key, "Discarding superseded response");
        return Refresh::Stale;
    }
    match result {
        Ok(value) => {
            apply(value);
            Refresh::Applied
        },
        Err(err) => {
            warn!(%key, error = %err, "Fetch failed; keeping previous state");
            Refresh::Failed
        },
    }
}
