mod state;
mod study;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use state::{ViewError, ViewState, view_state_from_resource};
pub use study::StudyView;
