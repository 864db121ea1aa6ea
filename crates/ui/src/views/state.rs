use std::fmt::Display;
use std::future::Future;

use dioxus::prelude::*;
use services::LiveDocument;

/// Generic failure shown in place of live content.
pub const LOAD_FAILED: &str = "Something went wrong. Please try again.";

#[derive(Clone, Debug, PartialEq)]
pub enum LiveState<T> {
    Loading,
    Ready(T),
    Failed,
}

/// Drive a signal from a live document feed for as long as the calling
/// component is mounted. `open` runs once; re-key the component to reopen.
pub fn use_live_document<T, E, F, Fut>(mut open: F) -> Signal<LiveState<T>>
where
    T: 'static,
    E: Display + 'static,
    F: FnMut() -> Fut + 'static,
    Fut: Future<Output = Result<LiveDocument<T, E>, E>> + 'static,
{
    let mut state = use_signal(|| LiveState::Loading);
    use_future(move || {
        let opened = open();
        async move {
            let mut live = match opened.await {
                Ok(live) => live,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to open live document");
                    state.set(LiveState::Failed);
                    return;
                }
            };
            while let Some(next) = live.next().await {
                match next {
                    Ok(value) => state.set(LiveState::Ready(value)),
                    Err(err) => {
                        tracing::warn!(error = %err, "live document update failed");
                        state.set(LiveState::Failed);
                    }
                }
            }
        }
    });
    state
}
