use progress::ProgressEngine;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) engine: ProgressEngine,
}
