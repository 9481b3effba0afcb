// Sheet ingestion: fetch → parse → dedupe → classify → persist → notify → follow-up.
// Exposed over HTTP by `handlers`; the batch logic lives in `pipeline`.

pub mod handlers;
pub mod pipeline;
