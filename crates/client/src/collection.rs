//! Generic list/create over any resource collection.

use goat_core::{DecodeError, Resource, parse_body};
use tracing::{Instrument, debug, info, info_span};

use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpRequest, Transport};

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;

/// List/create for every `Resource`, one request per call.
pub struct CollectionClient<'a> {
    config: &'a ClientConfig,
    transport: &'a dyn Transport,
}

impl<'a> CollectionClient<'a> {
    pub fn new(config: &'a ClientConfig, transport: &'a dyn Transport) -> Self {
        Self { config, transport }
    }

    /// GET `{base}/{endpoint}/` and decode every element, in server order.
    pub async fn list<R: Resource>(&self) -> ClientResult<Vec<R>> {
        let ctx = CallContext::new(self.config);
        let span = info_span!(
            "registry_call",
            op = "list",
            resource = R::ENDPOINT,
            request_id = %ctx.request_id()
        );

        self.fetch_all::<R>(ctx).instrument(span).await
    }

    /// POST the create payload and merge the 201 response into `instance`.
    ///
    /// On any failure the instance is left untouched, id included.
    pub async fn create<R: Resource>(&self, instance: &mut R) -> ClientResult<()> {
        if let Some(id) = instance.id() {
            return Err(ClientError::AlreadyCreated {
                resource: R::ENDPOINT,
                id,
            });
        }

        let ctx = CallContext::new(self.config);
        let span = info_span!(
            "registry_call",
            op = "create",
            resource = R::ENDPOINT,
            request_id = %ctx.request_id()
        );

        self.post_new(ctx, instance).instrument(span).await
    }

    async fn fetch_all<R: Resource>(&self, ctx: CallContext) -> ClientResult<Vec<R>> {
        let url = self.config.url_for(R::ENDPOINT);
        debug!(%url, "GET collection");

        let response = self.transport.send(ctx.apply(HttpRequest::get(url))).await?;
        if response.status != STATUS_OK {
            return Err(ClientError::RequestFailed {
                status: response.status,
                body: response.body,
            });
        }

        let items = R::decode_list(&parse_body(&response.body)?)?;
        info!(count = items.len(), "listed resources");
        Ok(items)
    }

    async fn post_new<R: Resource>(&self, ctx: CallContext, instance: &mut R) -> ClientResult<()> {
        let url = self.config.url_for(R::ENDPOINT);
        debug!(%url, "POST collection");

        let request = ctx.apply(HttpRequest::post(url, instance.to_json()));
        let response = self.transport.send(request).await?;
        if response.status != STATUS_CREATED {
            return Err(ClientError::CreateFailed {
                status: response.status,
                body: response.body,
            });
        }

        let created = R::from_json(&parse_body(&response.body)?)?;
        let id = created.id().ok_or(DecodeError::MissingId {
            resource: R::ENDPOINT,
        })?;

        instance.absorb(created);
        info!(%id, "created resource");
        Ok(())
    }
}
