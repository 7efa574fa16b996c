//! Background spawner for command futures.
//!
//! Native builds run commands on a lazily created multi-thread tokio runtime
//! owned by this module, so the UI loop never blocks on IO and the embedding
//! application does not need to provide a runtime. On wasm there is no tokio
//! reactor; futures go to the browser task queue via
//! `wasm_bindgen_futures::spawn_local`.

use std::future::Future;
use std::pin::Pin;

#[cfg(not(target_arch = "wasm32"))]
fn runtime() -> &'static tokio::runtime::Runtime {
    use std::sync::OnceLock;

    static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("roster-states")
            .enable_all()
            .build()
            .unwrap_or_else(|err| panic!("failed to start command runtime: {err}"))
    })
}

/// Spawn a command future on the platform's background executor.
pub(crate) fn spawn(future: Pin<Box<dyn Future<Output = ()> + Send>>) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        drop(runtime().spawn(future));
    }

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(future);
    }
}
