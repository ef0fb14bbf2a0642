//! The process-wide container and the functions to reach it.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;
use once_cell::sync::Lazy;

use crate::containers::basic::BasicContainer;

static INITIALIZATIONS: AtomicUsize = AtomicUsize::new(0);

// Created on first access; concurrent first callers block until it exists.
static INSTANCE: Lazy<BasicContainer> = Lazy::new(|| {
    INITIALIZATIONS.fetch_add(1, Ordering::SeqCst);
    debug!("initializing the global service container");
    BasicContainer::new()
});

/// Returns the single process-wide container, creating it on the first call.
///
/// The container is never dropped or reset. Code that can be handed a
/// container explicitly should take `&impl Container` instead and leave the
/// choice of instance to its caller.
///
/// ```
/// use iregistry::{get_instance, ContainerExt};
///
/// get_instance().provide("db", String::from("postgres://localhost"));
///
/// let db = get_instance().resolve_as::<String>("db").unwrap();
/// assert_eq!(db.as_str(), "postgres://localhost");
/// ```
pub fn get_instance() -> &'static BasicContainer {
    &INSTANCE
}

/// How many times the global container has been created: `0` before the
/// first [`get_instance`] call, `1` afterwards.
pub fn initialization_count() -> usize {
    INITIALIZATIONS.load(Ordering::SeqCst)
}
