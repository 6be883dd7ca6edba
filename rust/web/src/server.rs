use crate::errors::ErrorResponse;
use crate::handlers;
use crate::session::{SessionError, SessionManager};
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;
use warp::filters::body::BodyDeserializeError;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Reply;
use warp::{Filter, Rejection};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    session_ttl: Option<Duration>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            session_ttl: None,
        }
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0)
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    sessions: Arc<SessionManager>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        let sessions = match config.session_ttl {
            Some(ttl) => SessionManager::with_ttl(ttl),
            None => SessionManager::new(),
        };
        Self::new_with_dependencies(config, Arc::new(sessions))
    }

    pub fn new_with_dependencies(config: ServerConfig, sessions: Arc<SessionManager>) -> Self {
        Self { config, sessions }
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        Arc::clone(&self.sessions)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            context: AppContext::new(config),
        }
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let config = context.config().clone();
        let bind_addr = Self::bind_addr(&config)?;

        // warp hides the io::Error kind, so try binding fixed ports first
        if bind_addr.port() != 0 {
            drop(std::net::TcpListener::bind(bind_addr).map_err(ServerError::BindError)?);
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        info!(%addr, "web server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });
        let janitor = Self::spawn_cleanup(context.sessions());

        Ok(ServerHandle::new(addr, shutdown_tx, task, janitor, context))
    }

    /// Every route the server answers, with JSON errors for rejections.
    pub fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let health = Self::health_route();
        let api_routes = Self::api_routes(context);

        health
            .or(api_routes)
            .unify()
            .recover(Self::handle_rejection)
            .unify()
            .boxed()
    }

    fn spawn_cleanup(sessions: Arc<SessionManager>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                ticker.tick().await;
                let removed = sessions.cleanup_expired_sessions();
                if removed > 0 {
                    info!(removed, "expired sessions dropped");
                }
            }
        })
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }

        ServerError::ConfigError(err.to_string())
    }

    fn health_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health().into_response())
            .boxed()
    }

    fn api_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let sessions = context.sessions();

        let create = warp::path!("api" / "sessions")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(warp::body::json())
            .and_then(
                |sessions: Arc<SessionManager>,
                 request: handlers::CreateSessionRequest| async move {
                    let response = handlers::create_session(sessions, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let info = warp::path!("api" / "sessions" / String)
            .and(warp::get())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::get_session(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let step = warp::path!("api" / "sessions" / String / "step")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::step_session(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let actions = warp::path!("api" / "sessions" / String / "actions")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(warp::body::json())
            .and_then(
                |session_id: String,
                 sessions: Arc<SessionManager>,
                 request: handlers::ActionRequest| async move {
                    let response = handlers::apply_action(sessions, session_id, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let pause = warp::path!("api" / "sessions" / String / "pause")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::pause_session(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let resume = warp::path!("api" / "sessions" / String / "resume")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::resume_session(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let delete = warp::path!("api" / "sessions" / String)
            .and(warp::delete())
            .and(Self::with_session_manager(sessions))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::delete_session(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        create
            .or(step)
            .unify()
            .or(actions)
            .unify()
            .or(pause)
            .unify()
            .or(resume)
            .unify()
            .or(info)
            .unify()
            .or(delete)
            .unify()
            .boxed()
    }

    async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
        let (status, body) = if err.is_not_found() {
            (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("not_found", "No such route"),
            )
        } else if let Some(e) = err.find::<BodyDeserializeError>() {
            (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("invalid_request", e.to_string()),
            )
        } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
            (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse::new("method_not_allowed", "Method not allowed"),
            )
        } else {
            tracing::debug!(rejection = ?err, "unhandled rejection");
            (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("bad_request", "Request could not be processed"),
            )
        };
        Ok(body.into_response(status))
    }

    fn with_session_manager(
        sessions: Arc<SessionManager>,
    ) -> impl Filter<Extract = (Arc<SessionManager>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&sessions))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    janitor: Option<JoinHandle<()>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        janitor: JoinHandle<()>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            janitor: Some(janitor),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(janitor) = self.janitor.take() {
            janitor.abort();
        }
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }
        info!("web server stopped");
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(janitor) = self.janitor.take() {
            janitor.abort();
        }
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
