use crate::{error::Result, probe::ProbeCollection};

pub mod atlas;

/// Source of probe records. Implementations return the complete listing or
/// fail; there are no partial results.
pub trait ProbeFetcher {
    #[allow(async_fn_in_trait)]
    async fn fetch(&self) -> Result<ProbeCollection>;
}
