//! Session fixtures for unit tests

use crate::system::testing::{FakeControl, FakeProcTable, FakeResolver};
use crate::system::Collector;

use super::state::{Session, SessionConfig};

/// A session over `table` whose kills remove processes from it.
pub fn session_with(table: &FakeProcTable) -> (Session, FakeControl) {
    let control = FakeControl::killing_from(table);
    let collector = Collector::new(
        Box::new(table.clone()),
        Box::new(FakeResolver::with(&[(0, "root"), (1000, "alice")])),
    );
    let session = Session::new(collector, Box::new(control.clone()), &SessionConfig::default());
    (session, control)
}
