//! Tower Service implementation for tenant callback dispatch.

use crate::config::DispatchConfig;
use http::header::LOCATION;
use http::{HeaderValue, Request, Response, StatusCode};
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower_service::Service;

/// Tower Service that demultiplexes the shared SSO callback path to
/// tenant-specific authentication schemes.
///
/// Per inbound request:
/// 1. **Inspect**: is this the callback path carrying a `state` parameter?
/// 2. **Classify**: match the state prefix against the ordered route table.
/// 3. **Authenticate**: run the matched scheme's authenticator against the
///    ambient request context.
/// 4. **Redirect**: on success, redirect to the client redirect URI stashed
///    in the authentication properties and short-circuit the pipeline.
///
/// Every other terminal passes the request through to the inner service
/// unchanged. The state prefix is untrusted input: it selects a code path,
/// never a trust level.
#[derive(Debug, Clone)]
pub struct DispatchService<S> {
    inner: S,
    config: Arc<DispatchConfig>,
}

impl<S> DispatchService<S> {
    /// Create a new DispatchService.
    pub fn new(inner: S, config: Arc<DispatchConfig>) -> Self {
        Self { inner, config }
    }

    /// Evaluate the dispatch state machine, returning a redirect target when
    /// a tenant scheme authenticated the callback.
    fn evaluate<B>(&self, req: &Request<B>) -> Option<HeaderValue> {
        if req.uri().path() != self.config.callback_path() {
            return None;
        }

        let query = req.uri().query()?;
        let state = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())?;

        let Some(scheme) = self.config.table().match_state(&state) else {
            tracing::debug!(state = %state, "no tenant route for state prefix, passing through");
            return None;
        };

        // build() guarantees every routed scheme has an authenticator
        let authenticator = self.config.authenticator(scheme)?;

        let Some(properties) = authenticator.authenticate(req.headers()) else {
            tracing::debug!(scheme = %scheme, "scheme authentication failed, passing through");
            return None;
        };

        let Some(redirect_uri) = properties.redirect_uri() else {
            tracing::warn!(
                scheme = %scheme,
                "authenticated but no redirect_uri stashed, passing through"
            );
            return None;
        };

        match HeaderValue::from_str(redirect_uri) {
            Ok(location) => {
                tracing::info!(scheme = %scheme, redirect_uri = %redirect_uri, "tenant callback authenticated");
                Some(location)
            }
            Err(_) => {
                tracing::warn!(scheme = %scheme, "stashed redirect_uri is not a valid header value");
                None
            }
        }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DispatchService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = DispatchServiceFuture<S, ReqBody, ResBody>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if let Some(location) = self.evaluate(&req) {
            return DispatchServiceFuture::Redirect {
                location: Some(location),
            };
        }

        let inner = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, inner);
        DispatchServiceFuture::Inner {
            future: inner.call(req),
        }
    }
}

pin_project! {
    /// Future for DispatchService.
    #[project = DispatchServiceFutureProj]
    pub enum DispatchServiceFuture<S, ReqBody, ResBody>
    where
        S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    {
        /// Inner service future (dispatch not applicable or fell through)
        Inner {
            #[pin]
            future: S::Future,
        },
        /// Redirect response (tenant scheme authenticated the callback)
        Redirect {
            location: Option<HeaderValue>,
        },
    }
}

impl<S, ReqBody, ResBody> Future for DispatchServiceFuture<S, ReqBody, ResBody>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    ResBody: Default,
{
    type Output = Result<Response<ResBody>, S::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            DispatchServiceFutureProj::Inner { future } => future.poll(cx),
            DispatchServiceFutureProj::Redirect { location } => {
                let mut response = Response::new(ResBody::default());
                *response.status_mut() = StatusCode::FOUND;
                if let Some(location) = location.take() {
                    response.headers_mut().insert(LOCATION, location);
                }
                Poll::Ready(Ok(response))
            }
        }
    }
}
