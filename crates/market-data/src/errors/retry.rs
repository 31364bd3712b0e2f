/// Classification of a provider failure.
///
/// Inside a fallback chain every provider failure moves on to the next
/// provider (sequential mode) or contributes nothing (settle-all mode). The
/// class decides how loudly the failure is logged and is recorded in
/// [`FetchDiagnostics`](crate::registry::FetchDiagnostics).
///
/// | Class | Meaning |
/// |-------|---------|
/// | `Transient` | Timeout or rate limit. The same provider may answer later. |
/// | `NextProvider` | This provider cannot serve the request. Another one might. |
/// | `Terminal` | The request itself is unusable or every option is exhausted. |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Timeout or HTTP 429.
    Transient,

    /// Bad status, malformed payload, unknown symbol for this provider.
    NextProvider,

    /// Invalid request or exhausted chain.
    Terminal,
}
