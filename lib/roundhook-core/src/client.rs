//! The executor trait.
//!
//! [`HttpClient`] is the single "perform the request" operation. The default
//! network executor implements it, and so does the hook transport that wraps
//! one, which is what lets transports nest.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Method, Request, Response, Result};

/// Executes one HTTP request.
///
/// Implementations are shared across tasks, hence `Send + Sync`; the hook
/// transport calls [`HttpClient::execute`] concurrently on the same value.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error when no response could be obtained (connection, TLS,
    /// timeout, malformed request). Non-2xx statuses are responses, not errors.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}

/// Convenience methods for any [`HttpClient`].
pub trait HttpClientExt: HttpClient {
    /// Execute a GET request.
    fn get(&self, url: &str) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        async move {
            let url = url::Url::parse(url)?;
            self.execute(Request::builder(Method::Get, url).build()).await
        }
    }

    /// Execute a POST request with a JSON body.
    fn post_json<T: serde::Serialize + Send + Sync>(
        &self,
        url: &str,
        body: &T,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        async move {
            let url = url::Url::parse(url)?;
            let request = Request::<Bytes>::builder(Method::Post, url).json(body)?.build();
            self.execute(request).await
        }
    }

    /// Execute a DELETE request.
    fn delete(&self, url: &str) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        async move {
            let url = url::Url::parse(url)?;
            self.execute(Request::builder(Method::Delete, url).build()).await
        }
    }
}

impl<T: HttpClient> HttpClientExt for T {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use assert2::{check, let_assert};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(Method, String, Option<Bytes>)>>,
    }

    impl HttpClient for Recorder {
        async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
            let (method, url, _, body) = request.into_parts();
            self.seen
                .lock()
                .expect("lock")
                .push((method, url.to_string(), body));
            Ok(Response::new(202, HashMap::new(), Bytes::new()))
        }
    }

    #[tokio::test]
    async fn ext_methods_build_requests() {
        let recorder = Arc::new(Recorder::default());

        let got = recorder.get("https://api.example.com/a").await;
        let_assert!(Ok(response) = got);
        check!(response.status() == 202);

        let posted = recorder.post_json("https://api.example.com/b", &[1, 2]).await;
        let_assert!(Ok(_) = posted);

        let deleted = recorder.delete("https://api.example.com/c").await;
        let_assert!(Ok(_) = deleted);

        let seen = recorder.seen.lock().expect("lock");
        check!(
            *seen
                == vec![
                    (Method::Get, "https://api.example.com/a".to_string(), None),
                    (
                        Method::Post,
                        "https://api.example.com/b".to_string(),
                        Some(Bytes::from_static(b"[1,2]"))
                    ),
                    (Method::Delete, "https://api.example.com/c".to_string(), None),
                ]
        );
    }

    #[tokio::test]
    async fn invalid_url_never_reaches_executor() {
        let recorder = Recorder::default();

        let outcome = recorder.get("not a url").await;
        let_assert!(Err(crate::Error::InvalidUrl(_)) = outcome);
        check!(recorder.seen.lock().expect("lock").is_empty());
    }
}
