use dataprotocol_types::{Options, ProfilerSessionEvents, ProfilingResponse};

use crate::Result;
use crate::contracts::profiler;
use crate::convert::{from_wire, to_wire};

provider_handle! {
    /// Profiler sessions. Sessions are keyed by the id the host chose, which
    /// travels as `ownerUri` on the wire.
    ProfilerProvider
}

impl ProfilerProvider {
    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn start_session(&self, session_id: &str, options: Options) -> Result<ProfilingResponse> {
        let params = to_wire::start_profiling_params(session_id, options);
        self.conn.request_or_propagate(profiler::START, &params).await
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn stop_session(&self, session_id: &str) -> Result<ProfilingResponse> {
        let params = to_wire::stop_profiling_params(session_id);
        self.conn.request_or_propagate(profiler::STOP, &params).await
    }

    pub fn on_session_events_available<F>(&self, handler: F)
    where
        F: Fn(ProfilerSessionEvents) + Send + Sync + 'static,
    {
        self.conn
            .on_notification(profiler::EVENTS_AVAILABLE, move |params| {
                handler(from_wire::profiler_session_events(params));
            });
    }
}
